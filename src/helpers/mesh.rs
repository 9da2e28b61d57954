use bevy::asset::RenderAssetUsages;
use bevy::math::Vec3;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::Mesh;
use terraingen::mesh_data::MeshData;

/// Uploads a generated terrain mesh, optionally with tangents for normal mapping
pub fn terrain_mesh(data: &MeshData, with_tangents: bool) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, data.positions.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.uvs.clone());
    if with_tangents {
        mesh.insert_attribute(Mesh::ATTRIBUTE_TANGENT, terrain_tangents(&data.normals));
    }
    mesh.insert_indices(Indices::U32(data.indices.clone()));
    mesh
}

/// Per-vertex tangents for the terrain UV layout.
///
/// `u` grows along world `X` and `v` along world `Z`, so the tangent is `X`
/// projected onto each vertex's tangent plane. The `w` sign makes
/// `w * normal x tangent` point along `+Z`.
pub fn terrain_tangents(normals: &[[f32; 3]]) -> Vec<[f32; 4]> {
    normals
        .iter()
        .map(|n| {
            let normal = Vec3::from_array(*n);
            let tangent = (Vec3::X - normal * normal.dot(Vec3::X))
                .try_normalize()
                .unwrap_or(Vec3::X);
            let sign = if normal.cross(tangent).dot(Vec3::Z) >= 0.0 { 1.0 } else { -1.0 };
            [tangent.x, tangent.y, tangent.z, sign]
        })
        .collect()
}
