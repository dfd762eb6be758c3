//! Render parameters and the RON settings document the demo binary reads.

use crate::algorithms::Algorithm;
use crate::camera::{Camera, Projector};
use crate::color::Color;
use crate::error::{ConfigError, SceneError};
use crate::lighting::Light;
use nalgebra_glm::Vec3;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Perspective scale `k` in `k / z'`.
    pub focal_length: f32,
    /// Edge length in pixels of a hierarchical z-buffer tile.
    pub tile_size: usize,
    /// Grid step used when the z-buffer point-samples a height field.
    pub surface_step: f32,
    /// Quads per side when a height field is turned into polygons.
    pub surface_resolution: usize,
    /// Samples per axis for the floating horizon scan.
    pub horizon_resolution: usize,
    pub background: Color,
    /// Edge color for the painter's and backface-culling outlines.
    pub outline: Option<Color>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { width: 800, height: 600, focal_length: 500.0, tile_size: 16, surface_step: 0.1, surface_resolution: 20, horizon_resolution: 100, background: Color::BLACK, outline: None }
    }
}

impl RenderConfig {
    pub fn sized(width: usize, height: usize) -> Self { Self { width, height, ..Self::default() } }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 { return Err(ConfigError::InvalidDimensions { width: self.width, height: self.height }); }
        if self.tile_size == 0 { return Err(ConfigError::InvalidTileSize); }
        if !(self.focal_length > 0.0) || !self.focal_length.is_finite() { return Err(ConfigError::InvalidFocalLength(self.focal_length)); }
        if !(self.surface_step > 0.0) || !self.surface_step.is_finite() { return Err(ConfigError::InvalidSampling { name: "surface_step", value: self.surface_step }); }
        if self.surface_resolution == 0 { return Err(ConfigError::InvalidSampling { name: "surface_resolution", value: 0.0 }); }
        if self.horizon_resolution == 0 { return Err(ConfigError::InvalidSampling { name: "horizon_resolution", value: 0.0 }); }
        Ok(())
    }

    pub fn projector(&self) -> Projector { Projector::new(self.width, self.height, self.focal_length) }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub yaw: f32,
    pub zoom: f32,
}

impl Default for CameraSettings {
    fn default() -> Self { Self { position: [0.0, 0.0, 0.0], yaw: 0.0, zoom: 1.0 } }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    pub position: [f32; 3],
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: u32,
}

impl Default for LightSettings {
    fn default() -> Self { let l = Light::default(); Self { position: [l.position.x, l.position.y, l.position.z], ambient: l.ambient, diffuse: l.diffuse, specular: l.specular, shininess: l.shininess } }
}

/// Everything needed to render one frame apart from the scene itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub algorithm: String,
    pub render: RenderConfig,
    pub camera: CameraSettings,
    pub light: Option<LightSettings>,
    pub texture: Option<PathBuf>,
    /// When false, Texture Mapping without a texture is a configuration error.
    pub default_texture: bool,
    pub objects: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self { algorithm: "Z-Buffer".into(), render: RenderConfig::default(), camera: CameraSettings::default(), light: Some(LightSettings::default()), texture: None, default_texture: true, objects: vec!["cube".into(), "sphere".into()] }
    }
}

impl Settings {
    pub fn from_ron(text: &str) -> Result<Self, SceneError> {
        let settings: Settings = ron::from_str(text)?;
        settings.render.validate()?;
        Ok(settings)
    }
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&contents)?;
        log::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }
    pub fn algorithm(&self) -> Result<Algorithm, ConfigError> { self.algorithm.parse() }
    pub fn camera(&self) -> Camera { let [x, y, z] = self.camera.position; Camera::new(Vec3::new(x, y, z), self.camera.yaw, self.camera.zoom) }
    pub fn light(&self) -> Option<Light> {
        self.light.map(|l| { let [x, y, z] = l.position; Light::new(Vec3::new(x, y, z), l.ambient, l.diffuse, l.specular, l.shininess) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RenderConfig::default().validate().is_ok());
        assert_eq!(Settings::default().algorithm(), Ok(Algorithm::ZBuffer));
    }

    #[test]
    fn invalid_parameters_are_reported() {
        assert_eq!(RenderConfig { tile_size: 0, ..RenderConfig::default() }.validate(), Err(ConfigError::InvalidTileSize));
        assert_eq!(RenderConfig::sized(0, 10).validate(), Err(ConfigError::InvalidDimensions { width: 0, height: 10 }));
        assert!(matches!(RenderConfig { focal_length: -1.0, ..RenderConfig::default() }.validate(), Err(ConfigError::InvalidFocalLength(_))));
        assert!(matches!(RenderConfig { surface_step: 0.0, ..RenderConfig::default() }.validate(), Err(ConfigError::InvalidSampling { name: "surface_step", .. })));
    }

    #[test]
    fn ron_overrides_only_given_fields() {
        let s = Settings::from_ron(r#"(
            algorithm: "Depth Sort",
            render: (width: 320, height: 240, tile_size: 8, outline: Some((r: 255, g: 255, b: 255))),
            camera: (yaw: 0.5),
            light: None,
        )"#).unwrap();
        assert_eq!(s.algorithm(), Ok(Algorithm::DepthSort));
        assert_eq!((s.render.width, s.render.height, s.render.tile_size), (320, 240, 8));
        assert_eq!(s.render.focal_length, 500.0);
        assert_eq!(s.render.outline, Some(Color::WHITE));
        assert_eq!(s.camera().yaw, 0.5);
        assert_eq!(s.camera().zoom, 1.0);
        assert!(s.light().is_none());
    }

    #[test]
    fn invalid_ron_config_is_rejected() {
        assert!(matches!(Settings::from_ron("(render: (width: 0))"), Err(SceneError::Config(_))));
        assert!(matches!(Settings::from_ron("(render: "), Err(SceneError::Ron(_))));
    }

    #[test]
    fn light_coefficients_from_ron_are_clamped() {
        let s = Settings::from_ron("(light: Some((position: (0.0, 5.0, 0.0), ambient: 2.0, diffuse: -1.0, specular: 0.5, shininess: 0)))").unwrap();
        let light = s.light().unwrap();
        assert_eq!((light.ambient, light.diffuse, light.specular, light.shininess), (1.0, 0.0, 0.5, 1));
    }
}
