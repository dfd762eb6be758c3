use super::zbuffer::DepthPass;
use super::{visible_faces, HiddenSurface};
use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::framebuffer::Framebuffer;
use crate::lighting::Light;
use crate::mesh::{Scene, SceneObject};
use crate::raster::rasterize;

/// Two passes: opaque objects through the z-buffer, then transparent faces
/// blended in scene order wherever they lie at or in front of the opaque depth.
/// The transparent pass never writes depth.
#[derive(Debug, Clone)]
pub struct Transparency {
    pub config: RenderConfig,
}

impl Transparency {
    pub fn new(config: RenderConfig) -> Self { Self { config } }
}

impl HiddenSurface for Transparency {
    fn name(&self) -> &'static str { "Transparency" }
    fn reset(&mut self, width: usize, height: usize) { self.config.width = width; self.config.height = height; }

    fn render(&self, scene: &Scene, camera: &Camera, light: Option<&Light>) -> Framebuffer {
        let mut frame = Framebuffer::reset(self.config.width, self.config.height, self.config.background);
        let mut pass = DepthPass::new(&self.config, camera, light);
        let (transparent, opaque): (Vec<&SceneObject>, Vec<&SceneObject>) = scene.objects.iter().partition(|o| o.is_transparent());
        for object in opaque {
            match object {
                SceneObject::Mesh(mesh) => pass.draw_mesh(&mut frame, mesh, |face, _| face.color),
                SceneObject::Surface(surface) => pass.draw_surface(&mut frame, surface),
            }
        }

        let mut blended = 0;
        for object in transparent {
            let mesh = object.polygons(self.config.surface_resolution);
            let alpha = mesh.material.alpha;
            for face in visible_faces(&mesh, camera, &pass.projector, light, &mut pass.stats) {
                let c = face.color.to_unit();
                let (w, h) = (frame.width, frame.height);
                rasterize(&face.screen, w, h, |frag| {
                    if frag.depth <= frame.depth_at(frag.x, frag.y) {
                        frame.blend(frag.x, frag.y, c, alpha);
                        blended += 1;
                    }
                });
            }
        }
        pass.finish(self.name());
        log::debug!("{}: {} pixels blended", self.name(), blended);
        frame
    }
}
