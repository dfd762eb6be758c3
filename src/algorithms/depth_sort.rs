use super::{outline, visible_faces, FaceStats, HiddenSurface, VisibleFace};
use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::framebuffer::Framebuffer;
use crate::lighting::Light;
use crate::mesh::{Mesh, Scene};
use crate::raster::rasterize;
use std::borrow::Cow;

/// Painter's algorithm: faces sorted far to near by average depth, each one
/// overwriting whatever was drawn before it. No depth buffer is consulted.
#[derive(Debug, Clone)]
pub struct DepthSort {
    pub config: RenderConfig,
}

impl DepthSort {
    pub fn new(config: RenderConfig) -> Self { Self { config } }
}

impl HiddenSurface for DepthSort {
    fn name(&self) -> &'static str { "Depth Sort" }
    fn reset(&mut self, width: usize, height: usize) { self.config.width = width; self.config.height = height; }

    fn render(&self, scene: &Scene, camera: &Camera, light: Option<&Light>) -> Framebuffer {
        let mut frame = Framebuffer::reset(self.config.width, self.config.height, self.config.background);
        let projector = self.config.projector();
        let mut stats = FaceStats::default();
        let meshes: Vec<Cow<'_, Mesh>> = scene.objects.iter().map(|o| o.polygons(self.config.surface_resolution)).collect();
        let mut faces: Vec<VisibleFace<'_>> = meshes.iter().flat_map(|m| visible_faces(m, camera, &projector, light, &mut stats)).collect();
        // stable, so equal depths keep scene order
        faces.sort_by(|a, b| b.average_depth().total_cmp(&a.average_depth()));

        let mut pixels = 0;
        for face in &faces {
            let c = face.color.to_unit();
            rasterize(&face.screen, frame.width, frame.height, |frag| { frame.point_no_depth(frag.x, frag.y, c); pixels += 1; });
            if let Some(edge) = self.config.outline { outline(&mut frame, &face.screen, edge); }
        }
        stats.log(self.name(), pixels);
        frame
    }
}
