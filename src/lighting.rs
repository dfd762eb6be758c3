use crate::color::Color;
use nalgebra_glm::{vec3, Vec3};

/// Phong point light. Coefficients are in [0,1]; `shininess` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: u32,
}

impl Default for Light {
    fn default() -> Self { Self { position: vec3(2.0, 5.0, 5.0), ambient: 0.2, diffuse: 0.7, specular: 0.5, shininess: 32 } }
}

fn normalized(v: Vec3) -> Vec3 { let len = v.magnitude(); if len > f32::EPSILON { v / len } else { Vec3::zeros() } }

impl Light {
    pub fn new(position: Vec3, ambient: f32, diffuse: f32, specular: f32, shininess: u32) -> Self {
        Self { position, ambient: ambient.clamp(0.0, 1.0), diffuse: diffuse.clamp(0.0, 1.0), specular: specular.clamp(0.0, 1.0), shininess: shininess.max(1) }
    }

    /// Ambient + diffuse + white specular, each channel clamped to 0..255.
    /// The light vector is taken from the light position relative to the view direction.
    pub fn apply(&self, base: Color, normal: Vec3, view: Vec3) -> Color {
        let n = normalized(normal);
        let v = normalized(view);
        let l = normalized(self.position - v);
        let base = base.channels();
        let n_dot_l = n.dot(&l);
        let ambient = base * self.ambient;
        let diffuse = base * (self.diffuse * n_dot_l.max(0.0));
        let reflect = n * (2.0 * n_dot_l) - l;
        let spec = v.dot(&reflect).max(0.0).powi(self.shininess.max(1) as i32);
        let specular = vec3(255.0, 255.0, 255.0) * (self.specular * spec);
        Color::from_channels(ambient + diffuse + specular)
    }
}

/// Flat shading helper: lights `base` when a light is present.
pub fn shade(light: Option<&Light>, base: Color, normal: Vec3, view: Vec3) -> Color {
    match light { Some(l) => l.apply(base, normal, view), None => base }
}
