//! Face normals and backface determination.

use nalgebra_glm::{dot, Vec3};

/// Unit normal from the first three vertices in winding order, or the zero
/// vector for fewer than three vertices or a zero-area corner.
pub fn face_normal(vertices: &[Vec3]) -> Vec3 {
    if vertices.len() < 3 { return Vec3::zeros(); }
    let n = (vertices[1] - vertices[0]).cross(&(vertices[2] - vertices[0]));
    let len = n.magnitude();
    if len > f32::EPSILON && len.is_finite() { n / len } else { Vec3::zeros() }
}

pub fn is_degenerate(normal: &Vec3) -> bool { *normal == Vec3::zeros() }

/// Edge-on faces (zero dot product) count as backfaces.
pub fn is_backface(first_vertex: &Vec3, normal: &Vec3, camera_position: &Vec3) -> bool {
    dot(normal, &(camera_position - first_vertex)) <= 0.0
}
