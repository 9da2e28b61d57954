use crate::bake::vertex_heights;
use crate::config::MeshConfig;
use crate::error::{Result, TerrainError};
use crate::height_field::HeightField;
use crate::triangulation::FlatMesh;
use glam::{DVec3, Vec2, Vec3};
use log::debug;

/// Engine-agnostic triangle mesh
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Lifts the flat triangulation onto a sphere cap of radius `curvature_radius`
#[derive(Debug, Clone, Copy)]
pub struct CurvedMeshBuilder {
    pub mesh_size: f32,
    pub height_scale: f32,
    /// Non-finite or non-positive radius keeps the mesh flat
    pub curvature_radius: f32,
    /// Radial normals for a normal-mapped material instead of geometric ones
    pub use_normal_map: bool,
}

impl CurvedMeshBuilder {
    pub fn from_config(config: &MeshConfig) -> Self {
        Self {
            mesh_size: config.mesh_size,
            height_scale: config.height_scale,
            curvature_radius: config.curvature_radius,
            use_normal_map: config.use_normal_map,
        }
    }

    fn radius(&self) -> Option<f64> {
        let radius = self.curvature_radius as f64;
        (radius.is_finite() && radius > 0.0).then_some(radius)
    }

    /// World position of the field point `point` raised to `height`
    pub fn project(&self, point: Vec2, height: f32) -> Vec3 {
        let size = self.mesh_size as f64;
        let flat = DVec3::new(
            point.x as f64 * size,
            self.height_scale as f64 * size * height as f64,
            point.y as f64 * size,
        );
        match self.radius() {
            Some(radius) => flat_to_round(flat, radius).as_vec3(),
            None => flat.as_vec3(),
        }
    }

    pub fn build(&self, mesh: &FlatMesh, heights: &[f32]) -> Result<MeshData> {
        if !self.mesh_size.is_finite() || self.mesh_size <= 0.0 {
            return Err(TerrainError::invalid_parameter(format!(
                "mesh size must be > 0, got {}",
                self.mesh_size
            )));
        }
        if heights.len() != mesh.points.len() {
            return Err(TerrainError::invalid_parameter(format!(
                "expected {} heights, got {}",
                mesh.points.len(),
                heights.len()
            )));
        }

        let positions: Vec<Vec3> = mesh
            .points
            .iter()
            .zip(heights)
            .map(|(&p, &h)| self.project(p, h))
            .collect();

        // reversed so faces point up (+Y) once lifted
        let indices: Vec<u32> = mesh.triangles.iter().flat_map(|&[a, b, c]| [a, c, b]).collect();

        let normals = if self.use_normal_map {
            self.radial_normals(&positions)
        } else {
            face_averaged_normals(&positions, &indices)
        };

        let uvs = mesh.points.iter().map(|p| [p.x / 2.0 + 0.5, p.y / 2.0 + 0.5]).collect();

        debug!(
            "Built terrain mesh: {} vertices, {} triangles",
            positions.len(),
            indices.len() / 3
        );

        Ok(MeshData {
            positions: positions.iter().map(|p| p.to_array()).collect(),
            normals: normals.iter().map(|n| n.to_array()).collect(),
            uvs,
            indices,
        })
    }

    pub fn build_from_field(&self, mesh: &FlatMesh, field: &HeightField) -> Result<MeshData> {
        self.build(mesh, &vertex_heights(mesh, field))
    }

    fn radial_normals(&self, positions: &[Vec3]) -> Vec<Vec3> {
        match self.radius() {
            Some(radius) => {
                let origin = DVec3::new(0.0, -radius, 0.0);
                positions
                    .iter()
                    .map(|p| (p.as_dvec3() - origin).try_normalize().unwrap_or(DVec3::Y).as_vec3())
                    .collect()
            }
            None => vec![Vec3::Y; positions.len()],
        }
    }
}

/// Bends a flat point onto the sphere of `radius` touching the origin from below.
///
/// The `y` of `flat` is its elevation above the sphere, measured along the
/// ray from the sphere centre `(0, -radius, 0)`.
pub fn flat_to_round(flat: DVec3, radius: f64) -> DVec3 {
    let origin = DVec3::new(0.0, -radius, 0.0);
    let on_plane = DVec3::new(flat.x, 0.0, flat.z);
    let direction = (on_plane - origin).normalize_or(DVec3::Y);
    origin + direction * radius * (1.0 + flat.y / radius)
}

/// Area-weighted average of the adjacent face normals
fn face_averaged_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut sums = vec![Vec3::ZERO; positions.len()];
    for face in indices.chunks_exact(3) {
        let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
        // unnormalised, so larger faces weigh more
        let normal = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        sums[a] += normal;
        sums[b] += normal;
        sums[c] += normal;
    }
    sums.into_iter().map(|n| n.try_normalize().unwrap_or(Vec3::Y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::triangulate;
    use rstest::rstest;

    fn builder(curvature_radius: f32, use_normal_map: bool) -> CurvedMeshBuilder {
        CurvedMeshBuilder {
            mesh_size: 2.0,
            height_scale: 0.5,
            curvature_radius,
            use_normal_map,
        }
    }

    fn patch() -> FlatMesh {
        let mut points = Vec::new();
        for y in 0..5 {
            for x in 0..5 {
                points.push(Vec2::new(x as f32 / 2.0 - 1.0, y as f32 / 2.0 - 1.0));
            }
        }
        triangulate(points).unwrap()
    }

    fn bumpy(mesh: &FlatMesh) -> Vec<f32> {
        mesh.points.iter().map(|p| 0.5 * (1.0 - p.length_squared() / 2.0)).collect()
    }

    #[rstest]
    #[case(f32::INFINITY)]
    #[case(0.0)]
    #[case(-3.0)]
    fn test_flat_mesh_faces_point_up(#[case] radius: f32) {
        let mesh = patch();
        let data = builder(radius, false).build(&mesh, &vec![0.0; mesh.points.len()]).unwrap();

        assert_eq!(data.triangle_count(), mesh.triangles.len());
        for face in data.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from_array(data.positions[face[i] as usize]));
            assert!((b - a).cross(c - a).y > 0.0);
        }
        for n in &data.normals {
            assert!((Vec3::from_array(*n) - Vec3::Y).length() < 1e-5);
        }
    }

    #[test]
    fn test_uvs_follow_field_coordinates() {
        let mesh = patch();
        let data = builder(100.0, false).build(&mesh, &bumpy(&mesh)).unwrap();
        for (uv, p) in data.uvs.iter().zip(&mesh.points) {
            assert!((uv[0] - (p.x / 2.0 + 0.5)).abs() < 1e-6);
            assert!((uv[1] - (p.y / 2.0 + 0.5)).abs() < 1e-6);
            assert!((0.0..=1.0).contains(&uv[0]) && (0.0..=1.0).contains(&uv[1]));
        }
    }

    #[test]
    fn test_radial_normals_point_away_from_centre() {
        let mesh = patch();
        let radius = 3.0;
        let data = builder(radius, true).build(&mesh, &bumpy(&mesh)).unwrap();
        let origin = Vec3::new(0.0, -radius, 0.0);
        for (p, n) in data.positions.iter().zip(&data.normals) {
            let expected = (Vec3::from_array(*p) - origin).normalize();
            assert!((Vec3::from_array(*n) - expected).length() < 1e-4);
        }
    }

    #[test]
    fn test_projection_keeps_apex_and_elevation() {
        let radius = 5.0;
        let apex = flat_to_round(DVec3::new(0.0, 0.7, 0.0), radius);
        assert!((apex - DVec3::new(0.0, 0.7, 0.0)).length() < 1e-12);

        let p = flat_to_round(DVec3::new(1.5, 0.3, -2.0), radius);
        let distance = (p - DVec3::new(0.0, -radius, 0.0)).length();
        assert!((distance - (radius + 0.3)).abs() < 1e-9);
    }

    #[test]
    fn test_large_radius_converges_to_flat_mesh() {
        let mesh = patch();
        let heights = bumpy(&mesh);
        let flat = builder(f32::INFINITY, false).build(&mesh, &heights).unwrap();
        let curved = builder(1e7, false).build(&mesh, &heights).unwrap();

        for (a, b) in flat.positions.iter().zip(&curved.positions) {
            assert!((Vec3::from_array(*a) - Vec3::from_array(*b)).length() < 1e-4);
        }
        for (a, b) in flat.normals.iter().zip(&curved.normals) {
            assert!((Vec3::from_array(*a) - Vec3::from_array(*b)).length() < 1e-4);
        }
    }

    #[test]
    fn test_height_count_must_match_points() {
        let mesh = patch();
        assert!(matches!(
            builder(10.0, false).build(&mesh, &[0.0; 3]),
            Err(TerrainError::InvalidParameter(_))
        ));
    }
}
