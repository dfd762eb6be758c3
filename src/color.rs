use nalgebra_glm::Vec3;
use serde::Deserialize;
use std::ops::Mul;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }
    pub fn from_float(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: (r.clamp(0.0, 1.0) * 255.0) as u8,
            g: (g.clamp(0.0, 1.0) * 255.0) as u8,
            b: (b.clamp(0.0, 1.0) * 255.0) as u8,
        }
    }
    /// Channels already in the 0..255 range; out-of-range values are clamped, fractions truncated.
    pub fn from_channels(c: Vec3) -> Self {
        Self { r: c.x.clamp(0.0, 255.0) as u8, g: c.y.clamp(0.0, 255.0) as u8, b: c.z.clamp(0.0, 255.0) as u8 }
    }
    pub fn channels(self) -> Vec3 { Vec3::new(self.r as f32, self.g as f32, self.b as f32) }
    /// Normalized [0,1] color as stored in the frame buffer.
    pub fn to_unit(self) -> Vec3 { self.channels() / 255.0 }
    pub fn to_hex(self) -> u32 { ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32) }
}

impl Default for Color { fn default() -> Self { Color::BLACK } }

impl Mul<f32> for Color { type Output = Color; fn mul(self, s: f32) -> Color { Color { r: (self.r as f32 * s).clamp(0.0, 255.0) as u8, g: (self.g as f32 * s).clamp(0.0, 255.0) as u8, b: (self.b as f32 * s).clamp(0.0, 255.0) as u8 } } }
