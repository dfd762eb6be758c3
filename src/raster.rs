//! Polygon scan conversion over screen-space pixel coordinates.
//!
//! Coverage is the even-odd rule evaluated at integer pixel positions. Depth
//! and attributes are interpolated barycentrically over a triangle fan of the
//! polygon, with `1/z` interpolated linearly so the result is perspective-correct.

use crate::camera::ScreenPoint;
use crate::fragment::{Barycentric, Fragment};
use std::ops::{Add, Mul};

/// Inclusive pixel rectangle, already clamped to the raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

pub fn bounding_box(polygon: &[ScreenPoint], width: usize, height: usize) -> Option<BoundingBox> {
    if polygon.is_empty() || width == 0 || height == 0 { return None; }
    let mut min_x = polygon.iter().map(|p| p.x).min()?; let mut max_x = polygon.iter().map(|p| p.x).max()?;
    let mut min_y = polygon.iter().map(|p| p.y).min()?; let mut max_y = polygon.iter().map(|p| p.y).max()?;
    if max_x < 0 || max_y < 0 || min_x as i64 >= width as i64 || min_y as i64 >= height as i64 { return None; }
    min_x = min_x.max(0); min_y = min_y.max(0);
    max_x = max_x.min(width as i32 - 1); max_y = max_y.min(height as i32 - 1);
    Some(BoundingBox { min_x, min_y, max_x, max_y })
}

/// Even-odd ray casting. Points exactly on an edge may land either way.
pub fn point_in_polygon(x: f32, y: f32, polygon: &[ScreenPoint]) -> bool {
    let (x, y) = (x as f64, y as f64);
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for (i, pi) in polygon.iter().enumerate() {
        let pj = &polygon[j];
        let (xi, yi, xj, yj) = (pi.x as f64, pi.y as f64, pj.x as f64, pj.y as f64);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi { inside = !inside; }
        j = i;
    }
    inside
}

/// Twice the signed area (shoelace).
pub fn signed_area(polygon: &[ScreenPoint]) -> f64 {
    let n = polygon.len();
    (0..n).map(|i| { let a = &polygon[i]; let b = &polygon[(i + 1) % n]; a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64 }).sum()
}

fn edge(a: &ScreenPoint, b: &ScreenPoint, p: (f64, f64)) -> f64 { (p.0 - a.x as f64) * (b.y as f64 - a.y as f64) - (p.1 - a.y as f64) * (b.x as f64 - a.x as f64) }

fn weights_at(x: f32, y: f32, polygon: &[ScreenPoint]) -> Option<(Barycentric, f32)> {
    if polygon.len() < 3 { return None; }
    let p = (x as f64, y as f64);
    // Fan triangle containing the point; failing that, the one it is closest to being inside.
    let mut best: Option<(f64, [usize; 3], [f64; 3])> = None;
    for i in 1..polygon.len() - 1 {
        let (a, b, c) = (&polygon[0], &polygon[i], &polygon[i + 1]);
        let area = edge(a, b, (c.x as f64, c.y as f64));
        if area.abs() < 1e-9 { continue; }
        let w = [edge(b, c, p) / area, edge(c, a, p) / area, edge(a, b, p) / area];
        let worst = w[0].min(w[1]).min(w[2]);
        if best.map_or(true, |(m, _, _)| worst > m) { best = Some((worst, [0, i, i + 1], w)); }
        if worst >= 0.0 { break; }
    }
    let (worst, indices, mut w) = best?;
    if worst < 0.0 {
        w = w.map(|x| x.max(0.0));
        let total = w[0] + w[1] + w[2];
        if !(total > 0.0) { return None; }
        w = w.map(|x| x / total);
    }
    let inv = [w[0] / polygon[indices[0]].depth as f64, w[1] / polygon[indices[1]].depth as f64, w[2] / polygon[indices[2]].depth as f64];
    let sum = inv[0] + inv[1] + inv[2];
    if !(sum > 0.0) || !sum.is_finite() { return None; }
    let weights = [(inv[0] / sum) as f32, (inv[1] / sum) as f32, (inv[2] / sum) as f32];
    let zs = indices.map(|i| polygon[i].depth);
    let depth = ((1.0 / sum) as f32).clamp(zs[0].min(zs[1]).min(zs[2]), zs[0].max(zs[1]).max(zs[2]));
    Some((Barycentric { indices, weights }, depth))
}

pub fn barycentric(x: f32, y: f32, polygon: &[ScreenPoint]) -> Option<Barycentric> { weights_at(x, y, polygon).map(|(b, _)| b) }

pub fn interpolate_depth(x: f32, y: f32, polygon: &[ScreenPoint]) -> Option<f32> { weights_at(x, y, polygon).map(|(_, d)| d) }

pub fn interpolate_attribute<T>(x: f32, y: f32, polygon: &[ScreenPoint], values: &[T]) -> Option<T>
where T: Copy + Mul<f32, Output = T> + Add<Output = T> {
    if values.len() != polygon.len() { return None; }
    barycentric(x, y, polygon).map(|b| b.interpolate(values))
}

/// Emits one fragment per covered pixel inside the clamped bounding box.
/// Zero-area polygons emit nothing.
pub fn rasterize<F: FnMut(&Fragment)>(polygon: &[ScreenPoint], width: usize, height: usize, mut emit: F) {
    if polygon.len() < 3 || signed_area(polygon) == 0.0 { return; }
    let Some(bb) = bounding_box(polygon, width, height) else { return };
    for y in bb.min_y..=bb.max_y { for x in bb.min_x..=bb.max_x {
        let (fx, fy) = (x as f32, y as f32);
        if !point_in_polygon(fx, fy, polygon) { continue; }
        if let Some((bary, depth)) = weights_at(fx, fy, polygon) { emit(&Fragment { x, y, depth, bary }); }
    }}
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm::Vec2;

    fn sp(x: i32, y: i32, depth: f32) -> ScreenPoint { ScreenPoint { x, y, depth } }

    #[test]
    fn even_odd_inside_and_outside() {
        let square = [sp(0, 0, 1.0), sp(10, 0, 1.0), sp(10, 10, 1.0), sp(0, 10, 1.0)];
        assert!(point_in_polygon(5.0, 5.0, &square));
        assert!(!point_in_polygon(15.0, 5.0, &square));
        assert!(!point_in_polygon(-1.0, 5.0, &square));
        assert!(!point_in_polygon(5.0, 11.0, &square));
    }

    #[test]
    fn depth_varies_across_the_face() {
        // left edge at depth 2, right edge at depth 4
        let quad = [sp(0, 0, 2.0), sp(100, 0, 4.0), sp(100, 100, 4.0), sp(0, 100, 2.0)];
        let left = interpolate_depth(1.0, 50.0, &quad).unwrap();
        let right = interpolate_depth(99.0, 50.0, &quad).unwrap();
        assert!(left < right);
        assert!((interpolate_depth(0.0, 50.0, &quad).unwrap() - 2.0).abs() < 1e-5);
        assert!((interpolate_depth(100.0, 50.0, &quad).unwrap() - 4.0).abs() < 1e-5);
        // harmonic midpoint: 1 / ((1/2 + 1/4) / 2)
        assert!((interpolate_depth(50.0, 50.0, &quad).unwrap() - 8.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn constant_depth_is_preserved() {
        let tri = [sp(0, 0, 3.0), sp(40, 0, 3.0), sp(0, 40, 3.0)];
        assert!((interpolate_depth(10.0, 10.0, &tri).unwrap() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn attributes_follow_the_query_point() {
        let tri = [sp(0, 0, 1.0), sp(10, 0, 1.0), sp(0, 10, 1.0)];
        let uv = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let at = interpolate_attribute(5.0, 0.0, &tri, &uv).unwrap();
        assert!((at.x - 0.5).abs() < 1e-6 && at.y.abs() < 1e-6);
        assert!(interpolate_attribute(5.0, 0.0, &tri, &uv[..2]).is_none());
    }

    #[test]
    fn rasterize_stays_in_bounds() {
        let tri = [sp(-50, -50, 1.0), sp(200, -50, 1.0), sp(-50, 200, 1.0)];
        let mut count = 0;
        rasterize(&tri, 16, 8, |f| { assert!(f.x >= 0 && f.x < 16 && f.y >= 0 && f.y < 8); count += 1; });
        assert_eq!(count, 16 * 8);
    }

    #[test]
    fn zero_area_polygon_is_a_no_op() {
        let line = [sp(0, 0, 1.0), sp(5, 5, 1.0), sp(10, 10, 1.0)];
        let mut hit = false;
        rasterize(&line, 32, 32, |_| hit = true);
        assert!(!hit);
    }

    #[test]
    fn bounding_box_is_clamped() {
        let tri = [sp(-5, 3, 1.0), sp(50, 3, 1.0), sp(10, 40, 1.0)];
        assert_eq!(bounding_box(&tri, 20, 20), Some(BoundingBox { min_x: 0, min_y: 3, max_x: 19, max_y: 19 }));
        let off = [sp(30, 30, 1.0), sp(40, 30, 1.0), sp(30, 40, 1.0)];
        assert_eq!(bounding_box(&off, 20, 20), None);
    }
}
