use std::ops::{Add, Mul};

/// Perspective-corrected weights of one fan triangle of a polygon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Barycentric {
    pub indices: [usize; 3],
    pub weights: [f32; 3],
}

impl Barycentric {
    pub fn interpolate<T>(&self, values: &[T]) -> T where T: Copy + Mul<f32, Output = T> + Add<Output = T> {
        let [a, b, c] = self.indices; let [wa, wb, wc] = self.weights;
        values[a] * wa + values[b] * wb + values[c] * wc
    }
}

/// A covered pixel with its interpolated camera-space depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub x: i32,
    pub y: i32,
    pub depth: f32,
    pub bary: Barycentric,
}

impl Fragment {
    pub fn interpolate<T>(&self, values: &[T]) -> T where T: Copy + Mul<f32, Output = T> + Add<Output = T> { self.bary.interpolate(values) }
}
