use crate::color::Color;
use crate::error::SceneError;
use crate::mesh::Mesh;
use nalgebra_glm::{Vec3, vec3};
use std::path::Path;

/// Loads every model of an OBJ file as one mesh, keeping polygons whole.
/// A model's diffuse material color wins over `color` when the MTL provides one.
pub fn load_obj(path: &Path, position: Vec3, color: Color) -> Result<Vec<Mesh>, SceneError> {
    let (models, materials) = tobj::load_obj(path, &tobj::LoadOptions { single_index: true, triangulate: false, ..Default::default() })?;
    let materials = materials.unwrap_or_else(|e| { log::debug!("No materials for {:?}: {}", path, e); Vec::new() });
    let meshes: Vec<Mesh> = models.into_iter().map(|m| {
        let mesh = m.mesh;
        let vertices: Vec<Vec3> = mesh.positions.chunks_exact(3).map(|v| vec3(v[0], v[1], v[2])).collect();
        // no arities means every face is a triangle
        let arities: Vec<usize> = if mesh.face_arities.is_empty() { vec![3; mesh.indices.len() / 3] } else { mesh.face_arities.iter().map(|&a| a as usize).collect() };
        let mut faces = Vec::with_capacity(arities.len());
        let mut start = 0;
        for arity in arities {
            let Some(idx) = mesh.indices.get(start..start + arity) else { break };
            start += arity;
            let face: Vec<usize> = idx.iter().map(|&i| i as usize).collect();
            if face.iter().any(|&i| i >= vertices.len()) { log::warn!("{}: face {:?} references missing vertices, skipping", m.name, face); continue; }
            faces.push(face);
        }
        let diffuse = mesh.material_id.and_then(|id| materials.get(id)).and_then(|mat| mat.diffuse);
        let color = diffuse.map_or(color, |[r, g, b]| Color::from_float(r, g, b));
        Mesh::new(vertices, faces, position, color)
    }).collect();
    log::info!("Loaded {} meshes from {:?}", meshes.len(), path);
    Ok(meshes)
}
