use crate::color::Color;
use image::{ImageBuffer, Rgb, RgbImage};
use nalgebra_glm::Vec3;

/// Color plane (RGB in [0,1]) plus a depth plane of camera-space distances.
/// Depth starts at +infinity, meaning nothing has been drawn at that pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    pub width: usize,
    pub height: usize,
    pub color: Vec<Vec3>,
    pub depth: Vec<f32>,
}

impl Framebuffer {
    /// Fresh buffers for one frame.
    pub fn reset(width: usize, height: usize, background: Color) -> Self {
        Self { width, height, color: vec![background.to_unit(); width*height], depth: vec![f32::INFINITY; width*height] }
    }
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height { return None; }
        Some(y as usize * self.width + x as usize)
    }
    pub fn depth_at(&self, x: i32, y: i32) -> f32 { self.index(x, y).map_or(f32::INFINITY, |i| self.depth[i]) }
    pub fn color_at(&self, x: i32, y: i32) -> Option<Vec3> { self.index(x, y).map(|i| self.color[i]) }

    /// True when `depth` is strictly nearer than what is stored at the pixel.
    #[inline]
    pub fn passes(&self, x: i32, y: i32, depth: f32) -> bool {
        self.index(x, y).is_some_and(|i| depth < self.depth[i])
    }
    #[inline]
    pub fn point(&mut self, x: i32, y: i32, depth: f32, color: Vec3) {
        let Some(idx) = self.index(x, y) else { return };
        if depth < self.depth[idx] { self.depth[idx] = depth; self.color[idx] = color; }
    }
    #[inline]
    pub fn point_no_depth(&mut self, x: i32, y: i32, color: Vec3) {
        if let Some(idx) = self.index(x, y) { self.color[idx] = color; }
    }
    /// `alpha * color + (1 - alpha) * existing`, depth untouched.
    #[inline]
    pub fn blend(&mut self, x: i32, y: i32, color: Vec3, alpha: f32) {
        if let Some(idx) = self.index(x, y) { self.color[idx] = color * alpha + self.color[idx] * (1.0 - alpha); }
    }
    /// Bresenham over the part of the segment that lies on the raster.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Vec3) {
        let Some((x0, y0, x1, y1)) = clip_segment(x0, y0, x1, y1, self.width, self.height) else { return };
        let mut x0 = x0; let mut y0 = y0; let dx = (x1 - x0).abs(); let sx = if x0 < x1 {1} else {-1}; let dy = -(y1 - y0).abs(); let sy = if y0 < y1 {1} else {-1}; let mut err = dx + dy;
        loop { self.point_no_depth(x0, y0, color); if x0 == x1 && y0 == y1 { break; } let e2 = 2*err; if e2 >= dy { err += dy; x0 += sx; } if e2 <= dx { err += dx; y0 += sy; } }
    }
    pub fn to_argb_u32(&self) -> Vec<u32> {
        self.color.iter().map(|c| Color::from_float(c.x, c.y, c.z).to_hex()).collect()
    }
    pub fn to_rgb_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            let c = self.color[y as usize * self.width + x as usize];
            let px = Color::from_float(c.x, c.y, c.z);
            Rgb([px.r, px.g, px.b])
        })
    }
}

/// Liang-Barsky clip of a segment to `0..width` x `0..height`. Endpoints that
/// already lie on the raster are kept exactly.
fn clip_segment(x0: i32, y0: i32, x1: i32, y1: i32, width: usize, height: usize) -> Option<(i32, i32, i32, i32)> {
    if width == 0 || height == 0 { return None; }
    let (fx, fy) = (x0 as f64, y0 as f64);
    let (dx, dy) = (x1 as f64 - fx, y1 as f64 - fy);
    let (x_max, y_max) = ((width - 1) as f64, (height - 1) as f64);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-dx, fx), (dx, x_max - fx), (-dy, fy), (dy, y_max - fy)] {
        if p == 0.0 {
            if q < 0.0 { return None; }
            continue;
        }
        let r = q / p;
        if p < 0.0 { t0 = t0.max(r); } else { t1 = t1.min(r); }
        if t0 > t1 { return None; }
    }
    let at = |t: f64| ((fx + t * dx).round().clamp(0.0, x_max) as i32, (fy + t * dy).round().clamp(0.0, y_max) as i32);
    let ((ax, ay), (bx, by)) = (at(t0), at(t1));
    Some((ax, ay, bx, by))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_starts_at_infinity() {
        let fb = Framebuffer::reset(4, 3, Color::BLACK);
        assert_eq!(fb.color.len(), 12);
        assert!(fb.depth.iter().all(|d| *d == f32::INFINITY));
    }

    #[test]
    fn point_keeps_nearest() {
        let mut fb = Framebuffer::reset(2, 2, Color::BLACK);
        fb.point(1, 1, 5.0, Vec3::new(1.0, 0.0, 0.0));
        fb.point(1, 1, 7.0, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(fb.depth_at(1, 1), 5.0);
        assert_eq!(fb.color_at(1, 1), Some(Vec3::new(1.0, 0.0, 0.0)));
        fb.point(1, 1, 5.0, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(fb.color_at(1, 1), Some(Vec3::new(1.0, 0.0, 0.0)), "equal depth must not overwrite");
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut fb = Framebuffer::reset(2, 2, Color::BLACK);
        fb.point(-1, 0, 1.0, Vec3::new(1.0, 1.0, 1.0));
        fb.point_no_depth(2, 0, Vec3::new(1.0, 1.0, 1.0));
        assert!(fb.color.iter().all(|c| *c == Vec3::zeros()));
    }

    #[test]
    fn blend_mixes_with_existing() {
        let mut fb = Framebuffer::reset(1, 1, Color::new(255, 0, 0));
        fb.blend(0, 0, Vec3::new(0.0, 0.0, 1.0), 0.25);
        let c = fb.color_at(0, 0).unwrap();
        assert!((c.x - 0.75).abs() < 1e-6 && (c.z - 0.25).abs() < 1e-6);
    }

    #[test]
    fn line_covers_endpoints() {
        let mut fb = Framebuffer::reset(8, 8, Color::BLACK);
        let white = Vec3::new(1.0, 1.0, 1.0);
        fb.draw_line(0, 0, 7, 3, white);
        assert_eq!(fb.color_at(0, 0), Some(white));
        assert_eq!(fb.color_at(7, 3), Some(white));
    }

    #[test]
    fn line_is_clipped_to_the_raster() {
        let mut fb = Framebuffer::reset(8, 8, Color::BLACK);
        let white = Vec3::new(1.0, 1.0, 1.0);
        fb.draw_line(i32::MIN, 4, i32::MAX, 4, white);
        assert!((0..8).all(|x| fb.color_at(x, 4) == Some(white)));
        assert_eq!(fb.color.iter().filter(|c| **c == white).count(), 8);
        fb.draw_line(3, 3, i32::MIN, i32::MAX, white);
        assert_eq!(fb.color_at(3, 3), Some(white));
        assert_eq!(fb.color_at(0, 6), Some(white));
    }

    #[test]
    fn line_missing_the_raster_draws_nothing() {
        let mut fb = Framebuffer::reset(8, 8, Color::BLACK);
        fb.draw_line(-100, -5, 100, -1, Vec3::new(1.0, 1.0, 1.0));
        fb.draw_line(i32::MIN, i32::MIN, i32::MAX, i32::MIN, Vec3::new(1.0, 1.0, 1.0));
        assert!(fb.color.iter().all(|c| *c == Vec3::zeros()));
    }
}
