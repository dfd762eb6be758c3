use super::hierarchical::TileBuffer;
use super::{visible_faces, FaceStats, HiddenSurface, VisibleFace};
use crate::camera::{Camera, Projector};
use crate::color::Color;
use crate::config::RenderConfig;
use crate::fragment::Fragment;
use crate::framebuffer::Framebuffer;
use crate::lighting::{shade, Light};
use crate::mesh::{Mesh, Scene, SceneObject, Surface};
use crate::raster::{bounding_box, rasterize};

/// Per-pixel depth test: a fragment is written only when strictly nearer.
#[derive(Debug, Clone)]
pub struct ZBuffer {
    pub config: RenderConfig,
}

impl ZBuffer {
    pub fn new(config: RenderConfig) -> Self { Self { config } }
}

impl HiddenSurface for ZBuffer {
    fn name(&self) -> &'static str { "Z-Buffer" }
    fn reset(&mut self, width: usize, height: usize) { self.config.width = width; self.config.height = height; }
    fn render(&self, scene: &Scene, camera: &Camera, light: Option<&Light>) -> Framebuffer {
        let mut frame = Framebuffer::reset(self.config.width, self.config.height, self.config.background);
        let mut pass = DepthPass::new(&self.config, camera, light);
        pass.draw_scene(&mut frame, scene, |face, _| face.color);
        pass.finish(self.name());
        frame
    }
}

/// Z-buffer core shared by the z-buffer family. An optional tile buffer adds
/// the hierarchical reject test; the caller supplies each fragment's color.
pub(crate) struct DepthPass<'a> {
    pub projector: Projector,
    pub camera: &'a Camera,
    pub light: Option<&'a Light>,
    pub surface_step: f32,
    pub tiles: Option<TileBuffer>,
    pub stats: FaceStats,
    pub pixels: usize,
    pub failed_samples: usize,
}

impl<'a> DepthPass<'a> {
    pub fn new(config: &RenderConfig, camera: &'a Camera, light: Option<&'a Light>) -> Self {
        Self { projector: config.projector(), camera, light, surface_step: config.surface_step, tiles: None, stats: FaceStats::default(), pixels: 0, failed_samples: 0 }
    }

    pub fn with_tiles(mut self, tiles: TileBuffer) -> Self { self.tiles = Some(tiles); self }

    pub fn finish(&self, algorithm: &str) {
        self.stats.log(algorithm, self.pixels);
        if self.failed_samples > 0 { log::debug!("{}: {} height samples failed", algorithm, self.failed_samples); }
        if let Some(tiles) = &self.tiles { log::debug!("{}: {} of {} faces rejected by tiles", algorithm, tiles.stats.rejected, tiles.stats.tested); }
    }

    /// Meshes face by face; height fields are point-sampled.
    pub fn draw_scene<'s, S>(&mut self, frame: &mut Framebuffer, scene: &'s Scene, mut shade_fragment: S)
    where S: FnMut(&VisibleFace<'s>, &Fragment) -> Color {
        for object in &scene.objects {
            match object {
                SceneObject::Mesh(mesh) => self.draw_mesh(frame, mesh, &mut shade_fragment),
                SceneObject::Surface(surface) => self.draw_surface(frame, surface),
            }
        }
    }

    pub fn draw_mesh<'m, S>(&mut self, frame: &mut Framebuffer, mesh: &'m Mesh, mut shade_fragment: S)
    where S: FnMut(&VisibleFace<'m>, &Fragment) -> Color {
        for face in visible_faces(mesh, self.camera, &self.projector, self.light, &mut self.stats) {
            self.draw_face(frame, &face, &mut shade_fragment);
        }
    }

    pub fn draw_face<'m, S>(&mut self, frame: &mut Framebuffer, face: &VisibleFace<'m>, mut shade_fragment: S)
    where S: FnMut(&VisibleFace<'m>, &Fragment) -> Color {
        let (w, h) = (frame.width, frame.height);
        let min_depth = face.min_depth();
        let bb = bounding_box(&face.screen, w, h);
        if let Some(tiles) = self.tiles.as_mut() {
            tiles.stats.tested += 1;
            match bb {
                Some(bb) if !tiles.occludes(&bb, min_depth) => {}
                _ => { tiles.stats.rejected += 1; return; }
            }
        }
        let mut written = 0;
        rasterize(&face.screen, w, h, |frag| {
            if frame.passes(frag.x, frag.y, frag.depth) {
                let c = shade_fragment(face, frag).to_unit();
                frame.point(frag.x, frag.y, frag.depth, c);
                written += 1;
            }
        });
        self.pixels += written;
        if let (Some(tiles), Some(bb)) = (self.tiles.as_mut(), bb) { tiles.record(&bb, min_depth, frame); }
    }

    /// Samples `y = f(x, z)` on a fixed grid and depth-tests each projected sample alone.
    pub fn draw_surface(&mut self, frame: &mut Framebuffer, surface: &Surface) {
        let b = surface.bounds;
        let step = self.surface_step;
        let nx = ((b.x_max - b.x_min) / step).ceil().max(0.0) as usize;
        let nz = ((b.z_max - b.z_min) / step).ceil().max(0.0) as usize;
        let base = surface.material.color;
        for i in 0..nx {
            let x = b.x_min + i as f32 * step;
            if x >= b.x_max { break; }
            for j in 0..nz {
                let z = b.z_min + j as f32 * step;
                if z >= b.z_max { break; }
                let Some(world) = surface.point(x, z) else { self.failed_samples += 1; log::trace!("Height sample failed at ({}, {})", x, z); continue };
                let Some(p) = self.projector.project(world, self.camera) else { continue };
                if !frame.passes(p.x, p.y, p.depth) { continue; }
                let color = match (self.light, surface.normal(x, z, step)) {
                    (Some(_), Some(n)) => shade(self.light, base, n, self.camera.position - world),
                    _ => base,
                };
                frame.point(p.x, p.y, p.depth, color.to_unit());
                self.pixels += 1;
            }
        }
    }
}
