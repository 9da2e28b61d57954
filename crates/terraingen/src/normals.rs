//! Tangent-free normal map baked from the height raster.
//!
//! Channels are encoded as `(n + 1) / 2`. The four corner texels always hold
//! [`ENCODED_UP_NORMAL`] so the map tiles cleanly against a flat surround.

use crate::blur::gaussian_blur;
use crate::constants::ENCODED_UP_NORMAL;
use crate::error::{Result, TerrainError};
use crate::raster::Raster;
use glam::Vec3;
use log::debug;
use rayon::prelude::*;

pub fn synthesize_normals(
    height: &Raster<f32>,
    scale_height: f32,
    mesh_real_width: f32,
    blur_radius: f32,
) -> Result<Raster<[f32; 3]>> {
    if height.is_empty() {
        return Err(TerrainError::invalid_parameter("height raster is empty"));
    }
    if !scale_height.is_finite() || scale_height <= 0.0 {
        return Err(TerrainError::invalid_parameter(format!(
            "height scale must be > 0, got {}",
            scale_height
        )));
    }
    if !mesh_real_width.is_finite() || mesh_real_width <= 0.0 {
        return Err(TerrainError::invalid_parameter(format!(
            "mesh width must be > 0, got {}",
            mesh_real_width
        )));
    }

    let (width, rows) = (height.width(), height.height());
    let vz = mesh_real_width / width as f32 / scale_height;

    let mut normals = Raster::filled(width, rows, ENCODED_UP_NORMAL);
    normals
        .data_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, texel) in row.iter_mut().enumerate() {
                if is_corner(x, y, width, rows) {
                    continue;
                }
                let (fx, fy) = (x as f32, y as f32);
                let mut vx = height.sample_bilinear(fx - 0.5, fy) - height.sample_bilinear(fx + 0.5, fy);
                let mut vy = height.sample_bilinear(fx, fy - 0.5) - height.sample_bilinear(fx, fy + 0.5);
                if x == 0 || x == width - 1 {
                    vx = 0.0;
                }
                if y == 0 || y == rows - 1 {
                    vy = 0.0;
                }
                *texel = encode(Vec3::new(vx, vy, vz));
            }
        });

    let blurred = blur_channels(&normals, blur_radius);
    debug!("Synthesized {}x{} normal map (blur {})", width, rows, blur_radius);
    Ok(blurred)
}

/// Blurs the encoded channels separately, then restores unit length and the corners
fn blur_channels(normals: &Raster<[f32; 3]>, sigma: f32) -> Raster<[f32; 3]> {
    let [r, g, b] = [0, 1, 2].map(|c| gaussian_blur(&normals.map(|n| n[c]), sigma));
    let (width, rows) = (normals.width(), normals.height());

    let mut out = normals.clone();
    out.data_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, texel) in row.iter_mut().enumerate() {
                *texel = if is_corner(x, y, width, rows) {
                    ENCODED_UP_NORMAL
                } else {
                    let encoded = Vec3::new(r.get(x, y), g.get(x, y), b.get(x, y));
                    encode(encoded * 2.0 - Vec3::ONE)
                };
            }
        });
    out
}

fn encode(normal: Vec3) -> [f32; 3] {
    let n = normal.try_normalize().unwrap_or(Vec3::Z);
    ((n + Vec3::ONE) * 0.5).to_array()
}

fn is_corner(x: usize, y: usize, width: usize, height: usize) -> bool {
    (x == 0 || x == width - 1) && (y == 0 || y == height - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ramp(width: usize, height: usize) -> Raster<f32> {
        let data = (0..width * height).map(|i| (i % width) as f32 / width as f32).collect();
        Raster::from_vec(width, height, data).unwrap()
    }

    fn decoded(texel: [f32; 3]) -> Vec3 {
        Vec3::from_array(texel) * 2.0 - Vec3::ONE
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(3.0)]
    fn test_corners_are_pinned_exactly(#[case] blur: f32) {
        let normals = synthesize_normals(&ramp(12, 9), 0.25, 81.0, blur).unwrap();
        for (x, y) in [(0, 0), (11, 0), (0, 8), (11, 8)] {
            assert_eq!(normals.get(x, y), [0.5, 1.0, 0.5]);
        }
    }

    #[test]
    fn test_flat_field_points_along_third_axis() {
        let flat = Raster::filled(10, 10, 0.3);
        let normals = synthesize_normals(&flat, 0.25, 81.0, 1.0).unwrap();
        let texel = normals.get(5, 5);
        assert!((texel[0] - 0.5).abs() < 1e-4);
        assert!((texel[1] - 0.5).abs() < 1e-4);
        assert!((texel[2] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_slope_tilts_against_gradient() {
        let normals = synthesize_normals(&ramp(16, 16), 0.25, 4.0, 0.0).unwrap();
        let n = decoded(normals.get(8, 8));
        assert!(n.x < 0.0);
        assert!(n.y.abs() < 1e-5);
        assert!(n.z > 0.0);
        assert!((n.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_side_border_ignores_horizontal_slope() {
        let normals = synthesize_normals(&ramp(16, 16), 0.25, 4.0, 0.0).unwrap();
        let n = decoded(normals.get(0, 8));
        assert!(n.x.abs() < 1e-5);
    }

    #[rstest]
    #[case(Raster::filled(0, 0, 0.0), 0.25, 81.0)]
    #[case(Raster::filled(4, 4, 0.0), 0.0, 81.0)]
    #[case(Raster::filled(4, 4, 0.0), -1.0, 81.0)]
    #[case(Raster::filled(4, 4, 0.0), 0.25, 0.0)]
    fn test_bad_input_is_rejected(#[case] height: Raster<f32>, #[case] scale: f32, #[case] width: f32) {
        assert!(matches!(
            synthesize_normals(&height, scale, width, 1.0),
            Err(TerrainError::InvalidParameter(_))
        ));
    }
}
