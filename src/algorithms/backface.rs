use super::{outline, visible_faces, FaceStats, HiddenSurface};
use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::framebuffer::Framebuffer;
use crate::lighting::Light;
use crate::mesh::Scene;
use crate::raster::rasterize;

/// Object-space culling alone: every front-facing face is filled in scene
/// order. Correct by itself only for a single convex object.
#[derive(Debug, Clone)]
pub struct BackfaceCulling {
    pub config: RenderConfig,
}

impl BackfaceCulling {
    pub fn new(config: RenderConfig) -> Self { Self { config } }
}

impl HiddenSurface for BackfaceCulling {
    fn name(&self) -> &'static str { "Backface Culling" }
    fn reset(&mut self, width: usize, height: usize) { self.config.width = width; self.config.height = height; }

    fn render(&self, scene: &Scene, camera: &Camera, light: Option<&Light>) -> Framebuffer {
        let mut frame = Framebuffer::reset(self.config.width, self.config.height, self.config.background);
        let projector = self.config.projector();
        let mut stats = FaceStats::default();
        let mut pixels = 0;
        for object in &scene.objects {
            let mesh = object.polygons(self.config.surface_resolution);
            for face in visible_faces(&mesh, camera, &projector, light, &mut stats) {
                let c = face.color.to_unit();
                let (w, h) = (frame.width, frame.height);
                rasterize(&face.screen, w, h, |frag| { frame.point_no_depth(frag.x, frag.y, c); pixels += 1; });
                if let Some(edge) = self.config.outline { outline(&mut frame, &face.screen, edge); }
            }
        }
        stats.log(self.name(), pixels);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::color::Color;
    use crate::shapes;
    use nalgebra_glm::vec3;

    #[test]
    fn only_the_front_of_a_cube_is_drawn() {
        let cfg = RenderConfig { focal_length: 100.0, ..RenderConfig::sized(64, 64) };
        let cube = shapes::cube(vec3(0.0, 0.0, 5.0), 2.0, red());
        // lit, so each face has its own flat shade
        let light = crate::lighting::Light::default();
        let frame = BackfaceCulling::new(cfg).render(&Scene::new().with(cube), &Camera::default(), Some(&light));
        let front = frame.color_at(32, 32).unwrap();
        assert_ne!(front, Color::BLACK.to_unit());
        assert!(frame.color.iter().all(|c| *c == Color::BLACK.to_unit() || *c == front));
    }

    #[test]
    fn faces_turned_away_leave_the_background() {
        let mut away = facing_square(vec3(0.0, 0.0, 5.0), 1.0, green());
        away.faces[0].reverse();
        let frame = BackfaceCulling::new(RenderConfig::sized(64, 64)).render(&Scene::new().with(away), &Camera::default(), None);
        assert!(frame.color.iter().all(|c| *c == Color::BLACK.to_unit()));
    }

    #[test]
    fn later_objects_overwrite_earlier_ones() {
        let scene = Scene::new().with(facing_square(vec3(0.0, 0.0, 2.0), 0.5, red())).with(facing_square(vec3(0.0, 0.0, 6.0), 2.0, blue()));
        let frame = BackfaceCulling::new(RenderConfig::sized(64, 64)).render(&scene, &Camera::default(), None);
        assert_eq!(frame.color_at(32, 32), Some(blue().to_unit()));
    }

    #[test]
    fn outline_of_a_face_grazing_the_camera_plane_is_clipped() {
        let cfg = RenderConfig { outline: Some(Color::WHITE), ..RenderConfig::sized(400, 400) };
        let frame = BackfaceCulling::new(cfg).render(&Scene::new().with(grazing_triangle(red())), &Camera::default(), None);
        assert_eq!(frame.color_at(200, 33), Some(Color::WHITE.to_unit()));
        assert_eq!(frame.color_at(200, 100), Some(red().to_unit()));
    }
}
