//! Hidden-surface algorithms and the face pipeline they share.
//!
//! Every algorithm culls backfaces before any per-pixel work and discards a
//! face outright when one of its vertices projects behind the camera. Frame
//! state is allocated at the start of each `render` call and returned.

mod backface;
mod depth_sort;
mod floating_horizon;
mod hierarchical;
mod texture_mapping;
mod transparency;
mod zbuffer;

pub use backface::BackfaceCulling;
pub use depth_sort::DepthSort;
pub use floating_horizon::{FloatingHorizon, Horizon};
pub use hierarchical::{HierarchicalZBuffer, TileBuffer, TileStats};
pub use texture_mapping::TextureMapping;
pub use transparency::Transparency;
pub use zbuffer::ZBuffer;

use crate::camera::{Camera, Projector, ScreenPoint};
use crate::color::Color;
use crate::config::{RenderConfig, Settings};
use crate::error::ConfigError;
use crate::framebuffer::Framebuffer;
use crate::lighting::{shade, Light};
use crate::mesh::{Material, Mesh, Scene};
use crate::texture::Texture;
use crate::visibility::{face_normal, is_backface, is_degenerate};
use nalgebra_glm::Vec3;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    ZBuffer,
    HierarchicalZBuffer,
    DepthSort,
    BackfaceCulling,
    FloatingHorizon,
    TextureMapping,
    Transparency,
}

impl Algorithm {
    pub const ALL: [Algorithm; 7] = [
        Algorithm::ZBuffer, Algorithm::HierarchicalZBuffer, Algorithm::DepthSort, Algorithm::BackfaceCulling,
        Algorithm::FloatingHorizon, Algorithm::TextureMapping, Algorithm::Transparency,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::ZBuffer => "Z-Buffer",
            Algorithm::HierarchicalZBuffer => "Hierarchical Z-Buffer",
            Algorithm::DepthSort => "Depth Sort",
            Algorithm::BackfaceCulling => "Backface Culling",
            Algorithm::FloatingHorizon => "Floating Horizon",
            Algorithm::TextureMapping => "Texture Mapping",
            Algorithm::Transparency => "Transparency",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

fn squash(s: &str) -> String { s.chars().filter(|c| !matches!(c, ' ' | '-' | '_')).flat_map(char::to_lowercase).collect() }

impl FromStr for Algorithm {
    type Err = ConfigError;
    /// Display names, ignoring case, spaces, dashes and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = squash(s);
        Algorithm::ALL.into_iter().find(|a| squash(a.name()) == key).ok_or_else(|| ConfigError::UnknownAlgorithm(s.to_string()))
    }
}

/// A hidden-surface algorithm. Implementations hold only parameters; buffers
/// live for exactly one `render` call.
pub trait HiddenSurface {
    fn name(&self) -> &'static str;
    /// Sets the raster size used by subsequent renders.
    fn reset(&mut self, width: usize, height: usize);
    fn render(&self, scene: &Scene, camera: &Camera, light: Option<&Light>) -> Framebuffer;
}

/// Per-render face bookkeeping, logged at debug level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaceStats {
    pub considered: usize,
    pub malformed: usize,
    pub culled: usize,
    pub behind_camera: usize,
    pub accepted: usize,
}

impl FaceStats {
    pub(crate) fn log(&self, algorithm: &str, pixels: usize) {
        log::debug!(
            "{}: {} faces, {} accepted, {} culled, {} behind camera, {} malformed, {} pixels written",
            algorithm, self.considered, self.accepted, self.culled, self.behind_camera, self.malformed, pixels
        );
    }
}

/// A face that survived culling and projection.
#[derive(Debug, Clone)]
pub(crate) struct VisibleFace<'a> {
    pub world: Vec<Vec3>,
    pub screen: Vec<ScreenPoint>,
    pub normal: Vec3,
    pub material: &'a Material,
    /// Base color after flat lighting.
    pub color: Color,
}

impl VisibleFace<'_> {
    pub fn centroid(&self) -> Vec3 { self.world.iter().fold(Vec3::zeros(), |acc, v| acc + v) / self.world.len() as f32 }
    pub fn min_depth(&self) -> f32 { self.screen.iter().map(|p| p.depth).fold(f32::INFINITY, f32::min) }
    pub fn average_depth(&self) -> f32 { self.screen.iter().map(|p| p.depth).sum::<f32>() / self.screen.len() as f32 }
}

/// Culls, projects and flat-shades the faces of one mesh.
pub(crate) fn visible_faces<'a>(mesh: &'a Mesh, camera: &Camera, projector: &Projector, light: Option<&Light>, stats: &mut FaceStats) -> Vec<VisibleFace<'a>> {
    let mut out = Vec::with_capacity(mesh.faces.len());
    for face in &mesh.faces {
        stats.considered += 1;
        let Some(world) = mesh.face_vertices(face) else { stats.malformed += 1; log::trace!("Skipping malformed face {:?}", face); continue };
        let normal = face_normal(&world);
        if is_degenerate(&normal) { stats.malformed += 1; continue; }
        if is_backface(&world[0], &normal, &camera.position) { stats.culled += 1; continue; }
        let Some(screen) = projector.project_polygon(&world, camera) else { stats.behind_camera += 1; continue };
        stats.accepted += 1;
        let mut visible = VisibleFace { world, screen, normal, material: &mesh.material, color: mesh.material.color };
        visible.color = shade(light, mesh.material.color, normal, camera.position - visible.centroid());
        out.push(visible);
    }
    out
}

/// Outline of a projected polygon, closing edge included.
pub(crate) fn outline(frame: &mut Framebuffer, screen: &[ScreenPoint], color: Color) {
    let c = color.to_unit();
    for (i, a) in screen.iter().enumerate() {
        let b = &screen[(i + 1) % screen.len()];
        frame.draw_line(a.x, a.y, b.x, b.y, c);
    }
}

/// One of the seven algorithms, chosen by name at configuration time.
#[derive(Debug, Clone)]
pub enum Renderer {
    ZBuffer(ZBuffer),
    HierarchicalZBuffer(HierarchicalZBuffer),
    DepthSort(DepthSort),
    BackfaceCulling(BackfaceCulling),
    FloatingHorizon(FloatingHorizon),
    TextureMapping(TextureMapping),
    Transparency(Transparency),
}

impl Renderer {
    /// Validates `config` and builds the algorithm. Texture Mapping falls back
    /// to the checkerboard only when `default_texture` allows it.
    pub fn new(algorithm: Algorithm, config: RenderConfig, texture: Option<Texture>, default_texture: bool) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(match algorithm {
            Algorithm::ZBuffer => Renderer::ZBuffer(ZBuffer::new(config)),
            Algorithm::HierarchicalZBuffer => Renderer::HierarchicalZBuffer(HierarchicalZBuffer::new(config)),
            Algorithm::DepthSort => Renderer::DepthSort(DepthSort::new(config)),
            Algorithm::BackfaceCulling => Renderer::BackfaceCulling(BackfaceCulling::new(config)),
            Algorithm::FloatingHorizon => Renderer::FloatingHorizon(FloatingHorizon::new(config)),
            Algorithm::TextureMapping => {
                let texture = match texture {
                    Some(t) => t,
                    None if default_texture => Texture::checkerboard(),
                    None => return Err(ConfigError::MissingTexture),
                };
                Renderer::TextureMapping(TextureMapping::new(config, texture))
            }
            Algorithm::Transparency => Renderer::Transparency(Transparency::new(config)),
        })
    }

    pub fn from_settings(settings: &Settings, texture: Option<Texture>) -> Result<Self, ConfigError> {
        Self::new(settings.algorithm()?, settings.render, texture, settings.default_texture)
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Renderer::ZBuffer(_) => Algorithm::ZBuffer,
            Renderer::HierarchicalZBuffer(_) => Algorithm::HierarchicalZBuffer,
            Renderer::DepthSort(_) => Algorithm::DepthSort,
            Renderer::BackfaceCulling(_) => Algorithm::BackfaceCulling,
            Renderer::FloatingHorizon(_) => Algorithm::FloatingHorizon,
            Renderer::TextureMapping(_) => Algorithm::TextureMapping,
            Renderer::Transparency(_) => Algorithm::Transparency,
        }
    }

    fn inner(&self) -> &dyn HiddenSurface {
        match self {
            Renderer::ZBuffer(r) => r,
            Renderer::HierarchicalZBuffer(r) => r,
            Renderer::DepthSort(r) => r,
            Renderer::BackfaceCulling(r) => r,
            Renderer::FloatingHorizon(r) => r,
            Renderer::TextureMapping(r) => r,
            Renderer::Transparency(r) => r,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn HiddenSurface {
        match self {
            Renderer::ZBuffer(r) => r,
            Renderer::HierarchicalZBuffer(r) => r,
            Renderer::DepthSort(r) => r,
            Renderer::BackfaceCulling(r) => r,
            Renderer::FloatingHorizon(r) => r,
            Renderer::TextureMapping(r) => r,
            Renderer::Transparency(r) => r,
        }
    }
}

impl HiddenSurface for Renderer {
    fn name(&self) -> &'static str { self.inner().name() }
    fn reset(&mut self, width: usize, height: usize) { self.inner_mut().reset(width, height) }
    fn render(&self, scene: &Scene, camera: &Camera, light: Option<&Light>) -> Framebuffer { self.inner().render(scene, camera, light) }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::shapes;
    use nalgebra_glm::vec3;

    #[test]
    fn names_parse_loosely() {
        assert_eq!("Z-Buffer".parse(), Ok(Algorithm::ZBuffer));
        assert_eq!("zbuffer".parse(), Ok(Algorithm::ZBuffer));
        assert_eq!("hierarchical_z_buffer".parse(), Ok(Algorithm::HierarchicalZBuffer));
        assert_eq!("FLOATING HORIZON".parse(), Ok(Algorithm::FloatingHorizon));
        for a in Algorithm::ALL { assert_eq!(a.name().parse(), Ok(a)); }
    }

    #[test]
    fn unknown_name_is_a_config_error() {
        assert_eq!("Ray Tracing".parse::<Algorithm>(), Err(ConfigError::UnknownAlgorithm("Ray Tracing".into())));
    }

    #[test]
    fn texture_mapping_without_texture_needs_the_default() {
        let config = RenderConfig::sized(64, 64);
        assert!(matches!(Renderer::new(Algorithm::TextureMapping, config, None, false), Err(ConfigError::MissingTexture)));
        assert!(Renderer::new(Algorithm::TextureMapping, config, None, true).is_ok());
    }

    #[test]
    fn invalid_config_fails_before_rendering() {
        let config = RenderConfig { tile_size: 0, ..RenderConfig::sized(64, 64) };
        assert!(matches!(Renderer::new(Algorithm::HierarchicalZBuffer, config, None, true), Err(ConfigError::InvalidTileSize)));
    }

    #[test]
    fn renderer_dispatches_and_resets() {
        let mut r = Renderer::new(Algorithm::DepthSort, RenderConfig::sized(64, 64), None, true).unwrap();
        assert_eq!(r.algorithm(), Algorithm::DepthSort);
        assert_eq!(r.name(), "Depth Sort");
        r.reset(32, 16);
        let frame = r.render(&Scene::new(), &Camera::default(), None);
        assert_eq!((frame.width, frame.height), (32, 16));
    }

    #[test]
    fn pipeline_culls_and_discards() {
        let projector = Projector::new(200, 200, 100.0);
        let camera = Camera::default();
        let cube = shapes::cube(vec3(0.0, 0.0, 5.0), 1.0, red());
        let mut stats = FaceStats::default();
        let faces = visible_faces(&cube, &camera, &projector, None, &mut stats);
        // only the -z face looks at a camera straight in front of the cube
        assert_eq!(faces.len(), 1);
        assert_eq!(stats.culled, 5);

        let straddling = facing_square(vec3(0.0, 0.0, 0.0), 1.0, green());
        let mut moved = camera;
        moved.position = vec3(0.0, 0.0, -1.0);
        let mut stats = FaceStats::default();
        assert!(visible_faces(&straddling, &camera, &projector, None, &mut stats).is_empty());
        assert!(visible_faces(&straddling, &moved, &projector, None, &mut stats).len() == 1);
    }

    #[test]
    fn malformed_faces_are_skipped() {
        let mesh = Mesh::new(vec![vec3(0.0, 0.0, 5.0); 3], vec![vec![0, 1], vec![0, 1, 9], vec![0, 1, 2]], Vec3::zeros(), blue());
        let mut stats = FaceStats::default();
        assert!(visible_faces(&mesh, &Camera::default(), &Projector::new(10, 10, 10.0), None, &mut stats).is_empty());
        assert_eq!(stats.malformed, 3);
    }
}
