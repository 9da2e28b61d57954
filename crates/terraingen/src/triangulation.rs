use crate::error::{Result, TerrainError};
use glam::Vec2;
use log::{debug, trace};
use std::collections::HashSet;

/// Planar triangulation of the sampled points, `x, y ∈ [-1, 1]`
#[derive(Debug, Clone, Default)]
pub struct FlatMesh {
    pub points: Vec<Vec2>,
    /// Counter-clockwise index triples into `points`
    pub triangles: Vec<[u32; 3]>,
}

impl FlatMesh {
    pub fn corners(&self, triangle: [u32; 3]) -> [Vec2; 3] {
        triangle.map(|i| self.points[i as usize])
    }
}

/// Twice the signed area; positive for counter-clockwise corners
pub fn signed_area_2x(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

/// Delaunay triangulation of `points`.
///
/// Every returned triangle references input points only, winds
/// counter-clockwise and has a non-zero area. Duplicated input points are kept
/// in the point buffer but never referenced twice by the same triangle.
pub fn triangulate(points: Vec<Vec2>) -> Result<FlatMesh> {
    let distinct = points
        .iter()
        .map(|p| (p.x.to_bits(), p.y.to_bits()))
        .collect::<HashSet<_>>()
        .len();
    if distinct < 3 {
        return Err(TerrainError::TooFewPoints(distinct));
    }

    let input: Vec<delaunator::Point> = points
        .iter()
        .map(|p| delaunator::Point {
            x: p.x as f64,
            y: p.y as f64,
        })
        .collect();
    let triangulation = delaunator::triangulate(&input);

    let mut triangles = Vec::with_capacity(triangulation.triangles.len() / 3);
    let mut dropped = 0usize;
    for chunk in triangulation.triangles.chunks_exact(3) {
        let (a, mut b, mut c) = (chunk[0], chunk[1], chunk[2]);
        let area = orient(&input[a], &input[b], &input[c]);
        if area.abs() <= f64::EPSILON {
            trace!("Dropping sliver triangle {} {} {}", a, b, c);
            dropped += 1;
            continue;
        }
        if area < 0.0 {
            std::mem::swap(&mut b, &mut c);
        }
        triangles.push([a as u32, b as u32, c as u32]);
    }

    if triangles.is_empty() {
        return Err(TerrainError::DegenerateTriangulation(points.len()));
    }

    debug!(
        "Triangulated {} points into {} triangles ({} slivers dropped)",
        points.len(),
        triangles.len(),
        dropped
    );

    Ok(FlatMesh { points, triangles })
}

fn orient(a: &delaunator::Point, b: &delaunator::Point, c: &delaunator::Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn grid(n: usize) -> Vec<Vec2> {
        let mut points = Vec::new();
        for y in 0..n {
            for x in 0..n {
                points.push(Vec2::new(
                    x as f32 / (n - 1) as f32 * 2.0 - 1.0,
                    y as f32 / (n - 1) as f32 * 2.0 - 1.0,
                ));
            }
        }
        points
    }

    #[test]
    fn test_triangles_are_valid_and_counter_clockwise() {
        let mesh = triangulate(grid(6)).unwrap();
        assert!(!mesh.triangles.is_empty());
        for &triangle in &mesh.triangles {
            assert!(triangle.iter().all(|&i| (i as usize) < mesh.points.len()));
            let [a, b, c] = mesh.corners(triangle);
            assert!(signed_area_2x(a, b, c) > 1e-7);
        }
    }

    #[test]
    fn test_triangles_tile_convex_hull() {
        // the grid hull is the square [-1, 1]², area 4
        let mesh = triangulate(grid(5)).unwrap();
        let total: f32 = mesh
            .triangles
            .iter()
            .map(|&t| {
                let [a, b, c] = mesh.corners(t);
                signed_area_2x(a, b, c) / 2.0
            })
            .sum();
        assert!((total - 4.0).abs() < 1e-4, "total area {}", total);
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![Vec2::ZERO, Vec2::X])]
    #[case(vec![Vec2::ZERO, Vec2::X, Vec2::X, Vec2::ZERO])]
    fn test_too_few_distinct_points(#[case] points: Vec<Vec2>) {
        assert!(matches!(triangulate(points), Err(TerrainError::TooFewPoints(_))));
    }

    #[test]
    fn test_collinear_points_are_degenerate() {
        let points = vec![Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0)];
        assert!(matches!(
            triangulate(points),
            Err(TerrainError::DegenerateTriangulation(3))
        ));
    }

    #[test]
    fn test_duplicates_are_tolerated() {
        let mut points = grid(4);
        points.extend(grid(4));
        let mesh = triangulate(points).unwrap();
        for &[a, b, c] in &mesh.triangles {
            assert!(a != b && b != c && a != c);
        }
    }
}
