use super::HiddenSurface;
use crate::camera::{Camera, ScreenPoint};
use crate::color::Color;
use crate::config::RenderConfig;
use crate::framebuffer::Framebuffer;
use crate::lighting::{shade, Light};
use crate::mesh::Scene;
use nalgebra_glm::vec3;

/// Per-column screen-y extremes drawn so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Horizon {
    /// Largest screen y drawn in each column, `-inf` before any.
    pub upper: Vec<f32>,
    /// Smallest screen y drawn in each column, `+inf` before any.
    pub lower: Vec<f32>,
}

impl Horizon {
    pub fn reset(width: usize) -> Self { Self { upper: vec![f32::NEG_INFINITY; width], lower: vec![f32::INFINITY; width] } }
}

/// Silhouette rendering of the first height field in the scene, scanned from
/// the far edge of its bounds toward the camera. No depth buffer is used.
#[derive(Debug, Clone)]
pub struct FloatingHorizon {
    pub config: RenderConfig,
}

/// Shade applied to spans that are visible from below.
const UNDERSIDE: f32 = 0.6;

impl FloatingHorizon {
    pub fn new(config: RenderConfig) -> Self { Self { config } }

    /// Renders like `render`, handing the horizon to `observer` after every scanline.
    pub fn render_traced<F: FnMut(&Horizon)>(&self, scene: &Scene, camera: &Camera, light: Option<&Light>, mut observer: F) -> Framebuffer {
        let mut frame = Framebuffer::reset(self.config.width, self.config.height, self.config.background);
        let mut horizon = Horizon::reset(self.config.width);
        let Some(surface) = scene.objects.iter().find_map(|o| o.as_surface()) else {
            log::warn!("{}: scene has no height field, nothing to draw", self.name());
            return frame;
        };
        let extra = scene.objects.iter().filter(|o| o.as_surface().is_some()).count() - 1;
        if extra > 0 { log::debug!("{}: ignoring {} additional height fields", self.name(), extra); }

        let projector = self.config.projector();
        let n = self.config.horizon_resolution.max(1);
        let b = surface.bounds;
        let (x_step, z_step) = ((b.x_max - b.x_min) / n as f32, (b.z_max - b.z_min) / n as f32);
        // far edge is whichever z bound lies deeper in camera space
        let mid_x = (b.x_min + b.x_max) / 2.0;
        let depth_of = |z: f32| camera.to_camera_space(vec3(mid_x, 0.0, z) + surface.position).z;
        let far_first = depth_of(b.z_max) >= depth_of(b.z_min);

        let mut failed = 0;
        for k in 0..n {
            let z = if far_first { b.z_max - k as f32 * z_step } else { b.z_min + k as f32 * z_step };
            let mut prev: Option<ScreenPoint> = None;
            for i in 0..n {
                let x = b.x_min + i as f32 * x_step;
                let Some(world) = surface.point(x, z) else { failed += 1; prev = None; continue };
                let Some(p) = projector.project(world, camera) else { prev = None; continue };
                let color = match (light, surface.normal(x, z, x_step.max(z_step))) {
                    (Some(_), Some(normal)) => shade(light, surface.material.color, normal, camera.position - world),
                    _ => surface.material.color,
                };
                sweep(&mut frame, &mut horizon, prev, p, color);
                prev = Some(p);
            }
            observer(&horizon);
        }
        if failed > 0 { log::debug!("{}: {} samples skipped", self.name(), failed); }
        frame
    }
}

/// Visits the columns from `prev` (exclusive) to `p` (inclusive), interpolating y.
/// Only columns on the raster are stepped through.
fn sweep(frame: &mut Framebuffer, horizon: &mut Horizon, prev: Option<ScreenPoint>, p: ScreenPoint, color: Color) {
    let Some(q) = prev.filter(|q| q.x != p.x) else { return visit(frame, horizon, p.x as i64, p.y as f32, color) };
    let (qx, px) = (q.x as i64, p.x as i64);
    let last = horizon.upper.len() as i64 - 1;
    let (from, to) = if px > qx { ((qx + 1).max(0), px.min(last)) } else { (px.max(0), (qx - 1).min(last)) };
    let (span, rise) = ((px - qx) as f64, p.y as f64 - q.y as f64);
    for cx in from..=to {
        let t = (cx - qx) as f64 / span;
        visit(frame, horizon, cx, (q.y as f64 + t * rise) as f32, color);
    }
}

fn visit(frame: &mut Framebuffer, horizon: &mut Horizon, x: i64, y: f32, color: Color) {
    if x < 0 || x >= horizon.upper.len() as i64 { return; }
    let col = x as usize;
    let x = x as i32;
    let lower = horizon.lower[col];
    if y < lower {
        fill_span(frame, x, y, lower, (color * UNDERSIDE).to_unit());
        horizon.lower[col] = y;
    }
    let upper = horizon.upper[col];
    if y > upper {
        fill_span(frame, x, y, upper, color.to_unit());
        horizon.upper[col] = y;
    }
}

/// Column pixels from `y` toward the old horizon `to`; only `y` itself when `to` is unset.
fn fill_span(frame: &mut Framebuffer, x: i32, y: f32, to: f32, color: nalgebra_glm::Vec3) {
    let y0 = y.round() as i32;
    let y1 = if to.is_finite() { to.round() as i32 } else { y0 };
    let (lo, hi) = (y0.min(y1).max(0), y0.max(y1).min(frame.height as i32 - 1));
    for py in lo..=hi { frame.point_no_depth(x, py, color); }
}

impl HiddenSurface for FloatingHorizon {
    fn name(&self) -> &'static str { "Floating Horizon" }
    fn reset(&mut self, width: usize, height: usize) { self.config.width = width; self.config.height = height; }
    fn render(&self, scene: &Scene, camera: &Camera, light: Option<&Light>) -> Framebuffer { self.render_traced(scene, camera, light, |_| {}) }
}
