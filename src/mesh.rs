//! Scene geometry: polygonal meshes and procedural height-field surfaces.

use crate::color::Color;
use nalgebra_glm::{vec3, Vec3};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    pub transparent: bool,
    /// Blend weight of this object in the transparency pass.
    pub alpha: f32,
}

impl Material {
    pub fn opaque(color: Color) -> Self { Self { color, transparent: false, alpha: 0.5 } }
}

/// Vertices are in object space; `position` offsets them into world space.
/// Each face lists at least three vertex indices of a planar convex polygon,
/// wound so the right-hand normal points outward.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Vec<usize>>,
    pub position: Vec3,
    pub material: Material,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Vec<usize>>, position: Vec3, color: Color) -> Self {
        Self { vertices, faces, position, material: Material::opaque(color) }
    }
    pub fn transparent(mut self, alpha: f32) -> Self {
        self.material.transparent = true; self.material.alpha = alpha.clamp(0.0, 1.0); self
    }
    pub fn vertex(&self, index: usize) -> Option<Vec3> { self.vertices.get(index).map(|v| v + self.position) }
    /// World-space corners of a face, or `None` for fewer than three or dangling indices.
    pub fn face_vertices(&self, face: &[usize]) -> Option<Vec<Vec3>> {
        if face.len() < 3 { return None; }
        face.iter().map(|&i| self.vertex(i)).collect()
    }
}

/// `(x_min, x_max, z_min, z_max)` of a height field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl Bounds {
    pub fn new(x_min: f32, x_max: f32, z_min: f32, z_max: f32) -> Self { Self { x_min, x_max, z_min, z_max } }
}

pub type HeightFn = Arc<dyn Fn(f32, f32) -> f32 + Send + Sync>;

/// Height field `y = f(x, z)`. A non-finite result marks a failed sample.
#[derive(Clone)]
pub struct Surface {
    pub function: HeightFn,
    pub bounds: Bounds,
    pub position: Vec3,
    pub material: Material,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface").field("bounds", &self.bounds).field("position", &self.position).field("material", &self.material).finish_non_exhaustive()
    }
}

impl Surface {
    pub fn new<F: Fn(f32, f32) -> f32 + Send + Sync + 'static>(function: F, bounds: Bounds, color: Color) -> Self {
        Self { function: Arc::new(function), bounds, position: Vec3::zeros(), material: Material::opaque(color) }
    }
    pub fn height(&self, x: f32, z: f32) -> Option<f32> {
        let y = (self.function)(x, z);
        y.is_finite().then_some(y)
    }
    pub fn point(&self, x: f32, z: f32) -> Option<Vec3> { self.height(x, z).map(|y| vec3(x, y, z) + self.position) }
    /// Central-difference normal with spacing `h`; `None` if a neighbor fails.
    pub fn normal(&self, x: f32, z: f32, h: f32) -> Option<Vec3> {
        let dx = self.height(x + h, z)? - self.height(x - h, z)?;
        let dz = self.height(x, z + h)? - self.height(x, z - h)?;
        Some(vec3(-dx, 2.0 * h, -dz).normalize())
    }

    /// Uniform `resolution`×`resolution` quad grid; failed samples sit at y = 0.
    pub fn to_mesh(&self, resolution: usize) -> Mesh {
        let n = resolution.max(1);
        let Bounds { x_min, x_max, z_min, z_max } = self.bounds;
        let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
        for i in 0..=n {
            let x = x_min + i as f32 * (x_max - x_min) / n as f32;
            for j in 0..=n {
                let z = z_min + j as f32 * (z_max - z_min) / n as f32;
                vertices.push(vec3(x, self.height(x, z).unwrap_or(0.0), z));
            }
        }
        let mut faces = Vec::with_capacity(n * n);
        for i in 0..n { for j in 0..n {
            let v1 = i * (n + 1) + j; let v2 = v1 + 1; let v3 = (i + 1) * (n + 1) + j + 1; let v4 = (i + 1) * (n + 1) + j;
            faces.push(vec![v1, v2, v3, v4]);
        }}
        Mesh { vertices, faces, position: self.position, material: self.material }
    }
}

#[derive(Debug, Clone)]
pub enum SceneObject {
    Mesh(Mesh),
    Surface(Surface),
}

impl SceneObject {
    pub fn material(&self) -> &Material {
        match self { SceneObject::Mesh(m) => &m.material, SceneObject::Surface(s) => &s.material }
    }
    pub fn is_transparent(&self) -> bool { self.material().transparent }
    pub fn as_surface(&self) -> Option<&Surface> {
        match self { SceneObject::Surface(s) => Some(s), SceneObject::Mesh(_) => None }
    }
    /// Faces to draw for face-based algorithms; surfaces are realized on a grid.
    pub fn polygons(&self, resolution: usize) -> Cow<'_, Mesh> {
        match self { SceneObject::Mesh(m) => Cow::Borrowed(m), SceneObject::Surface(s) => Cow::Owned(s.to_mesh(resolution)) }
    }
}

impl From<Mesh> for SceneObject { fn from(m: Mesh) -> Self { SceneObject::Mesh(m) } }
impl From<Surface> for SceneObject { fn from(s: Surface) -> Self { SceneObject::Surface(s) } }

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self { Self::default() }
    pub fn with(mut self, object: impl Into<SceneObject>) -> Self { self.objects.push(object.into()); self }
    pub fn push(&mut self, object: impl Into<SceneObject>) { self.objects.push(object.into()); }
}
