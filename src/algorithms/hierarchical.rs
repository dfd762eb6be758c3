use super::zbuffer::DepthPass;
use super::HiddenSurface;
use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::framebuffer::Framebuffer;
use crate::lighting::Light;
use crate::mesh::Scene;
use crate::raster::BoundingBox;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileStats {
    pub tested: usize,
    pub rejected: usize,
}

/// Coarse depth grid over the raster, `tile_size` pixels per side.
///
/// A face is rejected only when its nearest vertex is no nearer than the
/// farthest depth stored anywhere in every tile its bounding box touches, so
/// no pixel of it could have passed the per-pixel test.
#[derive(Debug, Clone)]
pub struct TileBuffer {
    pub tile_size: usize,
    pub tiles_x: usize,
    pub tiles_y: usize,
    /// Nearest face depth seen among faces overlapping each tile. Kept for
    /// inspection only; `occludes` reads `farthest`.
    pub nearest: Vec<f32>,
    /// Farthest depth currently held by any pixel of each tile.
    pub farthest: Vec<f32>,
    pub stats: TileStats,
}

impl TileBuffer {
    pub fn reset(width: usize, height: usize, tile_size: usize) -> Self {
        let tile_size = tile_size.max(1);
        let tiles_x = width.div_ceil(tile_size); let tiles_y = height.div_ceil(tile_size);
        Self { tile_size, tiles_x, tiles_y, nearest: vec![f32::INFINITY; tiles_x*tiles_y], farthest: vec![f32::INFINITY; tiles_x*tiles_y], stats: TileStats::default() }
    }

    fn covered(&self, bb: &BoundingBox) -> impl Iterator<Item = (usize, usize)> {
        let ts = self.tile_size;
        let (tx0, tx1) = (bb.min_x as usize / ts, (bb.max_x as usize / ts).min(self.tiles_x.saturating_sub(1)));
        let (ty0, ty1) = (bb.min_y as usize / ts, (bb.max_y as usize / ts).min(self.tiles_y.saturating_sub(1)));
        (ty0..=ty1).flat_map(move |ty| (tx0..=tx1).map(move |tx| (tx, ty)))
    }

    pub fn occludes(&self, bb: &BoundingBox, min_depth: f32) -> bool {
        self.covered(bb).all(|(tx, ty)| min_depth >= self.farthest[ty * self.tiles_x + tx])
    }

    /// Lowers the nearest-face depth of every touched tile and refreshes its
    /// farthest stored depth from the frame.
    pub fn record(&mut self, bb: &BoundingBox, min_depth: f32, frame: &Framebuffer) {
        let tiles: Vec<_> = self.covered(bb).collect();
        for (tx, ty) in tiles {
            let t = ty * self.tiles_x + tx;
            self.nearest[t] = self.nearest[t].min(min_depth);
            let (x0, y0) = (tx * self.tile_size, ty * self.tile_size);
            let (x1, y1) = ((x0 + self.tile_size).min(frame.width), (y0 + self.tile_size).min(frame.height));
            let mut far = f32::NEG_INFINITY;
            for y in y0..y1 { far = frame.depth[y*frame.width + x0..y*frame.width + x1].iter().fold(far, |a, &d| a.max(d)); }
            self.farthest[t] = far;
        }
    }
}

/// Z-buffer with a conservative tile pre-test before per-pixel work.
#[derive(Debug, Clone)]
pub struct HierarchicalZBuffer {
    pub config: RenderConfig,
}

impl HierarchicalZBuffer {
    pub fn new(config: RenderConfig) -> Self { Self { config } }

    pub fn render_with_stats(&self, scene: &Scene, camera: &Camera, light: Option<&Light>) -> (Framebuffer, TileStats) {
        let mut frame = Framebuffer::reset(self.config.width, self.config.height, self.config.background);
        let tiles = TileBuffer::reset(self.config.width, self.config.height, self.config.tile_size);
        let mut pass = DepthPass::new(&self.config, camera, light).with_tiles(tiles);
        pass.draw_scene(&mut frame, scene, |face, _| face.color);
        pass.finish(self.name());
        let stats = pass.tiles.map(|t| t.stats).unwrap_or_default();
        (frame, stats)
    }
}

impl HiddenSurface for HierarchicalZBuffer {
    fn name(&self) -> &'static str { "Hierarchical Z-Buffer" }
    fn reset(&mut self, width: usize, height: usize) { self.config.width = width; self.config.height = height; }
    fn render(&self, scene: &Scene, camera: &Camera, light: Option<&Light>) -> Framebuffer { self.render_with_stats(scene, camera, light).0 }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::ZBuffer;
    use super::*;
    use crate::color::Color;
    use crate::mesh::{Mesh, SceneObject};
    use crate::shapes;
    use nalgebra_glm::vec3;
    use proptest::prelude::*;

    fn config() -> RenderConfig { RenderConfig { focal_length: 100.0, tile_size: 8, ..RenderConfig::sized(64, 48) } }

    #[test]
    fn tile_grid_rounds_up() {
        let t = TileBuffer::reset(65, 48, 16);
        assert_eq!((t.tiles_x, t.tiles_y), (5, 3));
        assert!(t.farthest.iter().all(|d| *d == f32::INFINITY));
    }

    #[test]
    fn empty_tiles_never_occlude() {
        let t = TileBuffer::reset(32, 32, 16);
        let bb = BoundingBox { min_x: 0, min_y: 0, max_x: 31, max_y: 31 };
        assert!(!t.occludes(&bb, 1000.0));
    }

    #[test]
    fn record_tracks_nearest_and_farthest() {
        let mut frame = Framebuffer::reset(4, 4, Color::BLACK);
        frame.depth.fill(3.0);
        frame.depth[0] = 1.0;
        let mut t = TileBuffer::reset(4, 4, 2);
        let bb = BoundingBox { min_x: 0, min_y: 0, max_x: 1, max_y: 1 };
        t.record(&bb, 1.0, &frame);
        assert_eq!(t.nearest[0], 1.0);
        assert_eq!(t.farthest[0], 3.0);
        assert!(t.occludes(&bb, 3.0));
        assert!(!t.occludes(&bb, 2.9));
        assert_eq!(t.farthest[1], f32::INFINITY);
    }

    #[test]
    fn hidden_face_is_rejected_early() {
        // a wall covering the whole raster, then a face behind it
        let scene = Scene::new().with(facing_square(vec3(0.0, 0.0, 2.0), 10.0, red())).with(facing_square(vec3(0.0, 0.0, 6.0), 1.0, blue()));
        let (frame, stats) = HierarchicalZBuffer::new(config()).render_with_stats(&scene, &Camera::default(), None);
        assert_eq!(stats.tested, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(frame, ZBuffer::new(config()).render(&scene, &Camera::default(), None));
    }

    #[test]
    fn small_occluder_does_not_hide_larger_face() {
        let scene = Scene::new().with(facing_square(vec3(0.0, 0.0, 2.0), 0.1, red())).with(facing_square(vec3(0.0, 0.0, 6.0), 1.0, blue()));
        let (frame, stats) = HierarchicalZBuffer::new(config()).render_with_stats(&scene, &Camera::default(), None);
        assert_eq!(stats.rejected, 0);
        assert_eq!(frame.color_at(32 + 10, 24), Some(blue().to_unit()));
    }

    #[test]
    fn matches_plain_zbuffer_on_demo_scene() {
        let scene = shapes::demo_scene(&["cube", "sphere", "torus", "surface"]);
        let cfg = RenderConfig { tile_size: 16, ..RenderConfig::sized(200, 150) };
        let camera = Camera::new(vec3(0.0, 0.0, -2.0), 0.0, 0.5);
        let light = Light::default();
        let hzb = HierarchicalZBuffer::new(cfg).render(&scene, &camera, Some(&light));
        let zb = ZBuffer::new(cfg).render(&scene, &camera, Some(&light));
        assert_eq!(hzb, zb);
    }

    fn quad() -> impl Strategy<Value = Mesh> {
        (-2.0f32..2.0, -2.0f32..2.0, 2.0f32..12.0, 0.2f32..6.0, 0u8..=255)
            .prop_map(|(x, y, z, half, g)| facing_square(vec3(x, y, z), half, Color::new(255, g, 0)))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn never_drops_a_visible_face(quads in prop::collection::vec(quad(), 1..8), tile in 1usize..20) {
            let scene = Scene { objects: quads.into_iter().map(SceneObject::from).collect() };
            let cfg = RenderConfig { tile_size: tile, ..config() };
            let hzb = HierarchicalZBuffer::new(cfg).render(&scene, &Camera::default(), None);
            let zb = ZBuffer::new(cfg).render(&scene, &Camera::default(), None);
            prop_assert_eq!(hzb.color, zb.color);
            prop_assert!(hzb.depth.iter().zip(&zb.depth).all(|(a, b)| a.to_bits() == b.to_bits()));
        }
    }
}
