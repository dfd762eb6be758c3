use super::zbuffer::DepthPass;
use super::{visible_faces, HiddenSurface};
use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::framebuffer::Framebuffer;
use crate::lighting::Light;
use crate::mesh::Scene;
use crate::texture::Texture;
use nalgebra_glm::{Vec2, Vec3};

/// Z-buffer whose fragments take their color from a texture, lit per pixel
/// with the face normal when a light is present.
#[derive(Debug, Clone)]
pub struct TextureMapping {
    pub config: RenderConfig,
    pub texture: Texture,
}

impl TextureMapping {
    pub fn new(config: RenderConfig, texture: Texture) -> Self { Self { config, texture } }
}

/// Planar UVs: the face is projected onto the plane of the two axes left after
/// dropping its normal's dominant one, then min/max normalized. `v` runs from
/// the high end of the second axis so y-up faces keep the image upright.
/// An axis with no extent maps to 0.
pub fn planar_uvs(vertices: &[Vec3], normal: &Vec3) -> Vec<Vec2> {
    let n = normal.abs();
    let (a, b) = if n.x >= n.y && n.x >= n.z { (2, 1) } else if n.y >= n.z { (0, 2) } else { (0, 1) };
    let range = |axis: usize| {
        let lo = vertices.iter().map(|v| v[axis]).fold(f32::INFINITY, f32::min);
        let hi = vertices.iter().map(|v| v[axis]).fold(f32::NEG_INFINITY, f32::max);
        (lo, hi)
    };
    let ((a_lo, a_hi), (b_lo, b_hi)) = (range(a), range(b));
    let norm = |t: f32, span: f32| if span > 0.0 { t / span } else { 0.0 };
    vertices.iter().map(|v| Vec2::new(norm(v[a] - a_lo, a_hi - a_lo), norm(b_hi - v[b], b_hi - b_lo))).collect()
}

impl HiddenSurface for TextureMapping {
    fn name(&self) -> &'static str { "Texture Mapping" }
    fn reset(&mut self, width: usize, height: usize) { self.config.width = width; self.config.height = height; }

    fn render(&self, scene: &Scene, camera: &Camera, light: Option<&Light>) -> Framebuffer {
        let mut frame = Framebuffer::reset(self.config.width, self.config.height, self.config.background);
        let mut pass = DepthPass::new(&self.config, camera, light);
        for object in &scene.objects {
            let mesh = object.polygons(self.config.surface_resolution);
            for face in visible_faces(&mesh, camera, &pass.projector, light, &mut pass.stats) {
                let uvs = planar_uvs(&face.world, &face.normal);
                let view = camera.position - face.centroid();
                pass.draw_face(&mut frame, &face, |face, frag| {
                    let uv = frag.interpolate(&uvs);
                    let texel = self.texture.sample(uv.x, uv.y);
                    light.map_or(texel, |l| l.apply(texel, face.normal, view))
                });
            }
        }
        pass.finish(self.name());
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::color::Color;
    use nalgebra_glm::vec3;

    fn config() -> RenderConfig { RenderConfig { focal_length: 100.0, ..RenderConfig::sized(64, 48) } }

    #[test]
    fn uvs_span_the_face() {
        let quad = [vec3(-1.0, -1.0, 4.0), vec3(-1.0, 1.0, 4.0), vec3(1.0, 1.0, 4.0), vec3(1.0, -1.0, 4.0)];
        let uvs = planar_uvs(&quad, &vec3(0.0, 0.0, -1.0));
        assert_eq!(uvs, vec![Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)]);
    }

    #[test]
    fn flat_extent_maps_to_zero() {
        // a sliver with no height along y
        let strip = [vec3(0.0, 0.0, 0.0), vec3(2.0, 0.0, 0.0), vec3(2.0, 0.0, 1.0)];
        let uvs = planar_uvs(&strip, &vec3(0.0, 0.0, 1.0));
        assert!(uvs.iter().all(|uv| uv.y == 0.0));
        assert_eq!(uvs[1].x, 1.0);
    }

    #[test]
    fn checkerboard_shows_both_colors() {
        let scene = Scene::new().with(facing_square(vec3(0.0, 0.0, 2.0), 2.0, red()));
        let frame = TextureMapping::new(config(), Texture::checkerboard()).render(&scene, &Camera::default(), None);
        assert!(frame.color.iter().any(|c| *c == Color::WHITE.to_unit()));
        assert!(frame.color.iter().any(|c| *c == blue().to_unit()));
        assert!(frame.color.iter().all(|c| *c != red().to_unit()));
    }

    #[test]
    fn texture_coordinates_vary_across_the_face() {
        let texture = Texture::from_pixels(2, 1, vec![red(), green()]).unwrap();
        let scene = Scene::new().with(facing_square(vec3(0.0, 0.0, 4.0), 1.0, blue()));
        let frame = TextureMapping::new(config(), texture).render(&scene, &Camera::default(), None);
        let left = frame.color_at(9, 24).unwrap();
        let right = frame.color_at(55, 24).unwrap();
        assert!(left.x > left.y);
        assert!(right.y > right.x);
    }

    #[test]
    fn lighting_uses_the_face_normal() {
        let texture = Texture::from_pixels(1, 1, vec![Color::WHITE]).unwrap();
        let light = Light::default();
        let scene = Scene::new().with(facing_square(vec3(0.0, 0.0, 4.0), 1.0, blue()));
        let frame = TextureMapping::new(config(), texture).render(&scene, &Camera::default(), Some(&light));
        let expected = light.apply(Color::WHITE, vec3(0.0, 0.0, -1.0), -vec3(0.0, 0.0, 4.0));
        assert_eq!(frame.color_at(32, 24), Some(expected.to_unit()));
    }

    #[test]
    fn nearer_textured_face_keeps_the_depth() {
        let scene = Scene::new().with(facing_square(vec3(0.0, 0.0, 2.0), 0.25, red())).with(facing_square(vec3(0.0, 0.0, 4.0), 1.0, blue()));
        let frame = TextureMapping::new(config(), Texture::checkerboard()).render(&scene, &Camera::default(), None);
        assert!((frame.depth_at(32, 24) - 2.0).abs() < 1e-5);
        assert!((frame.depth_at(52, 24) - 4.0).abs() < 1e-5);
    }
}
