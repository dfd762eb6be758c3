use crate::color::Color;
use crate::error::ConfigError;
use image::RgbImage;
use nalgebra_glm::Vec3;

/// Row-major RGB texel grid; row 0 is the top of the image (v = 0).
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<Color>,
}

impl Texture {
    pub fn from_pixels(width: usize, height: usize, texels: Vec<Color>) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 { return Err(ConfigError::InvalidDimensions { width, height }); }
        if texels.len() != width * height { return Err(ConfigError::TextureSize { expected: width * height, actual: texels.len() }); }
        Ok(Self { width, height, texels })
    }

    pub fn from_image(img: &RgbImage) -> Result<Self, ConfigError> {
        let texels = img.pixels().map(|p| Color::new(p[0], p[1], p[2])).collect();
        Self::from_pixels(img.width() as usize, img.height() as usize, texels)
    }

    /// 256×256 white/blue checkerboard with 8 squares per side.
    pub fn checkerboard() -> Self {
        let size = 256; let tile = size / 8;
        let texels = (0..size * size).map(|i| {
            let (row, col) = (i / size, i % size);
            if (row / tile + col / tile) % 2 == 0 { Color::WHITE } else { Color::new(0, 0, 255) }
        }).collect();
        Self { width: size, height: size, texels }
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn texel(&self, x: usize, y: usize) -> Color { self.texels[y * self.width + x] }

    /// Bilinear sample; `u` and `v` are clamped to [0,1].
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        let x = u * (self.width - 1) as f32; let y = v * (self.height - 1) as f32;
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = ((x0 + 1).min(self.width - 1), (y0 + 1).min(self.height - 1));
        let (fx, fy) = (x - x0 as f32, y - y0 as f32);
        let lerp = |a: Vec3, b: Vec3, t: f32| a * (1.0 - t) + b * t;
        let top = lerp(self.texel(x0, y0).channels(), self.texel(x1, y0).channels(), fx);
        let bottom = lerp(self.texel(x0, y1).channels(), self.texel(x1, y1).channels(), fx);
        let c = lerp(top, bottom, fy);
        Color::from_channels(c.map(|ch| ch.round()))
    }
}
