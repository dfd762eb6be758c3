use nalgebra_glm::{vec3, Vec3};

/// Yaw-only camera. Rotation is about the vertical (y) axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self { Self { position: vec3(0.0, 0.0, 0.0), yaw: 0.0, zoom: 1.0 } }
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, zoom: f32) -> Self { Self { position, yaw, zoom } }
    pub fn turn(&mut self, dyaw: f32) { self.yaw = (self.yaw + dyaw) % std::f32::consts::TAU; }

    /// World to camera space: translate by `-position`, then rotate about y by `-yaw`.
    pub fn to_camera_space(&self, p: Vec3) -> Vec3 {
        let d = p - self.position;
        let (s, c) = self.yaw.sin_cos();
        vec3(d.x * c - d.z * s, d.y, d.x * s + d.z * c)
    }
}

/// Integer pixel position with the camera-space depth of the projected point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
    pub depth: f32,
}

/// Perspective projection onto a `width`×`height` raster with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub width: usize,
    pub height: usize,
    pub focal_length: f32,
}

impl Projector {
    pub fn new(width: usize, height: usize, focal_length: f32) -> Self { Self { width, height, focal_length } }

    /// `None` when the point is at or behind the camera plane (`z' <= 0`).
    pub fn project(&self, p: Vec3, camera: &Camera) -> Option<ScreenPoint> {
        let c = camera.to_camera_space(p);
        if !(c.z > 0.0) { return None; }
        let scale = self.focal_length * camera.zoom / c.z;
        let sx = (self.width / 2) as f32 + c.x * scale;
        let sy = (self.height / 2) as f32 - c.y * scale;
        if !sx.is_finite() || !sy.is_finite() { return None; }
        Some(ScreenPoint { x: sx.floor() as i32, y: sy.floor() as i32, depth: c.z })
    }

    /// Projects every vertex; any vertex behind the camera discards the whole polygon.
    pub fn project_polygon(&self, vertices: &[Vec3], camera: &Camera) -> Option<Vec<ScreenPoint>> {
        vertices.iter().map(|v| self.project(*v, camera)).collect()
    }
}
