//! Procedural scene objects with outward-facing winding.

use crate::color::Color;
use crate::mesh::{Bounds, Mesh, Scene, Surface};
use nalgebra_glm::{vec3, Vec3};
use std::f32::consts::{PI, TAU};

pub fn cube(position: Vec3, size: f32, color: Color) -> Mesh {
    let h = size / 2.0;
    let vertices = vec![
        vec3(-h, -h, -h), vec3(h, -h, -h), vec3(h, h, -h), vec3(-h, h, -h),
        vec3(-h, -h, h), vec3(h, -h, h), vec3(h, h, h), vec3(-h, h, h),
    ];
    let faces = vec![
        vec![0, 3, 2, 1], // -z
        vec![4, 5, 6, 7], // +z
        vec![0, 1, 5, 4], // -y
        vec![3, 7, 6, 2], // +y
        vec![0, 4, 7, 3], // -x
        vec![1, 2, 6, 5], // +x
    ];
    Mesh::new(vertices, faces, position, color)
}

/// Latitude/longitude sphere around the z axis; polar rows are triangles.
pub fn sphere(position: Vec3, radius: f32, color: Color, resolution: usize) -> Mesh {
    let n = resolution.max(3);
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for i in 0..=n {
        let theta = i as f32 * PI / n as f32;
        for j in 0..=n {
            let phi = j as f32 * TAU / n as f32;
            vertices.push(vec3(radius * theta.sin() * phi.cos(), radius * theta.sin() * phi.sin(), radius * theta.cos()));
        }
    }
    let mut faces = Vec::with_capacity(n * n);
    for i in 0..n { for j in 0..n {
        let v1 = i * (n + 1) + j; let v2 = v1 + 1; let v3 = (i + 1) * (n + 1) + j + 1; let v4 = (i + 1) * (n + 1) + j;
        faces.push(if i == 0 { vec![v1, v4, v3] } else if i == n - 1 { vec![v1, v4, v2] } else { vec![v1, v4, v3, v2] });
    }}
    Mesh::new(vertices, faces, position, color)
}

pub fn torus(position: Vec3, major_radius: f32, minor_radius: f32, color: Color, segments: usize) -> Mesh {
    let n = segments.max(3);
    let mut vertices = Vec::with_capacity(n * n);
    let mut faces = Vec::with_capacity(n * n);
    for i in 0..n {
        let theta = TAU * i as f32 / n as f32;
        for j in 0..n {
            let phi = TAU * j as f32 / n as f32;
            let ring = major_radius + minor_radius * phi.cos();
            vertices.push(vec3(ring * theta.cos(), ring * theta.sin(), minor_radius * phi.sin()));
            let (ni, nj) = ((i + 1) % n, (j + 1) % n);
            faces.push(vec![i * n + j, ni * n + j, ni * n + nj, i * n + nj]);
        }
    }
    Mesh::new(vertices, faces, position, color)
}

/// `sin(r)/r`, undefined at the origin.
pub fn ripple(color: Color) -> Surface {
    Surface::new(|x, z| { let r = (x * x + z * z).sqrt(); r.sin() / r }, Bounds::new(-3.0, 3.0, -3.0, 3.0), color)
}

pub const DEMO_OBJECTS: [&str; 4] = ["cube", "sphere", "surface", "torus"];

/// The default scene: any of `cube`, `sphere`, `surface`, `torus` by name.
pub fn demo_scene<S: AsRef<str>>(names: &[S]) -> Scene {
    let mut scene = Scene::new();
    for name in names {
        match name.as_ref().to_ascii_lowercase().as_str() {
            "cube" => scene.push(cube(vec3(-1.5, 0.0, 5.0), 1.0, Color::new(255, 0, 0))),
            "sphere" => scene.push(sphere(vec3(1.5, 0.0, 6.0), 1.0, Color::new(0, 0, 255), 20)),
            "surface" => scene.push(ripple(Color::new(0, 255, 0))),
            "torus" => scene.push(torus(vec3(0.0, -1.5, 7.0), 1.5, 0.5, Color::new(255, 255, 0), 32)),
            other => log::warn!("Unknown demo object {:?}, skipping", other),
        }
    }
    scene
}
