//! Baking of the field and the graph into textures.

use crate::blur::gaussian_blur;
use crate::constants::{EPSILON, TRANSPARENT};
use crate::error::{Result, TerrainError};
use crate::graph::CommunityGraph;
use crate::height_field::HeightField;
use crate::raster::{Raster, field_to_texel, texel_to_field};
use crate::triangulation::{FlatMesh, signed_area_2x};
use glam::Vec2;
use log::{debug, trace};
use rayon::prelude::*;

// Pixel centres sitting exactly on a shared edge must land in one of the two triangles
const INSIDE_TOLERANCE: f32 = 1e-6;

/// Field value at every triangulation point
pub fn vertex_heights(mesh: &FlatMesh, field: &HeightField) -> Vec<f32> {
    mesh.points.par_iter().map(|&p| field.max_weight_at(p)).collect()
}

/// Linear interpolation of per-vertex values over every triangle footprint.
///
/// Pixels no triangle covers keep 0. Values end up clamped to `[0, 1]`.
pub fn rasterize_vertex_values(mesh: &FlatMesh, values: &[f32], width: usize, height: usize) -> Result<Raster<f32>> {
    check_resolution(width, height)?;
    if values.len() != mesh.points.len() {
        return Err(TerrainError::invalid_parameter(format!(
            "expected {} vertex values, got {}",
            mesh.points.len(),
            values.len()
        )));
    }

    let mut raster = Raster::filled(width, height, 0.0f32);
    let mut skipped = 0usize;

    for &triangle in &mesh.triangles {
        let [a, b, c] = mesh.corners(triangle);
        let area = signed_area_2x(a, b, c);
        if area.abs() < EPSILON * EPSILON {
            trace!("Skipping degenerate triangle {:?}", triangle);
            skipped += 1;
            continue;
        }
        let [va, vb, vc] = triangle.map(|i| values[i as usize]);

        let (x_range, y_range) = texel_bounds(a.min(b).min(c), a.max(b).max(c), width, height);
        for y in y_range {
            let py = texel_to_field(y, height);
            for x in x_range.clone() {
                let p = Vec2::new(texel_to_field(x, width), py);
                let wa = signed_area_2x(p, b, c) / area;
                let wb = signed_area_2x(a, p, c) / area;
                let wc = 1.0 - wa - wb;
                if wa < -INSIDE_TOLERANCE || wb < -INSIDE_TOLERANCE || wc < -INSIDE_TOLERANCE {
                    continue;
                }
                let value = wa * va + wb * vb + wc * vc;
                raster.set(x, y, value.clamp(0.0, 1.0));
            }
        }
    }

    if skipped > 0 {
        debug!("Skipped {} degenerate triangles while rasterizing", skipped);
    }
    Ok(raster)
}

/// Field sampled at the vertices, then rasterized
pub fn height_raster(mesh: &FlatMesh, field: &HeightField, width: usize, height: usize) -> Result<Raster<f32>> {
    let values = vertex_heights(mesh, field);
    rasterize_vertex_values(mesh, &values, width, height)
}

/// Community colours as soft discs, composited in node order.
///
/// A node covers the pixels within `radius_factor` of its influence radius, its
/// opacity fading linearly from the centre to the rim. That fade multiplies the
/// node's own colour alpha rather than replacing it, so a translucent community
/// stays translucent at its centre.
pub fn node_color_raster(
    graph: &CommunityGraph,
    field: &HeightField,
    width: usize,
    height: usize,
    radius_factor: f32,
) -> Result<Raster<[f32; 4]>> {
    check_resolution(width, height)?;
    if !radius_factor.is_finite() || radius_factor < 0.0 {
        return Err(TerrainError::invalid_parameter(format!(
            "radius factor must be >= 0, got {}",
            radius_factor
        )));
    }

    let discs: Vec<(Vec2, f32, [f32; 4])> = graph
        .nodes()
        .iter()
        .map(|node| {
            let radius = field.radius_from_node_size(node.size) * radius_factor;
            (node.position, radius, node.color)
        })
        .filter(|(_, radius, _)| *radius >= EPSILON)
        .collect();

    let mut raster = Raster::filled(width, height, TRANSPARENT);
    raster
        .data_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let py = texel_to_field(y, height);
            for (x, pixel) in row.iter_mut().enumerate() {
                let p = Vec2::new(texel_to_field(x, width), py);
                for &(center, radius, color) in &discs {
                    let dist = p.distance(center);
                    if dist >= radius {
                        continue;
                    }
                    let alpha = (1.0 - dist / radius) * color[3];
                    *pixel = over(color, alpha, *pixel);
                }
            }
        });

    Ok(raster)
}

/// Straight-alpha `source over destination`
fn over(color: [f32; 4], alpha: f32, dst: [f32; 4]) -> [f32; 4] {
    let dst_alpha = dst[3];
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    if out_alpha <= EPSILON {
        return TRANSPARENT;
    }
    let channel = |i: usize| (color[i] * alpha + dst[i] * dst_alpha * (1.0 - alpha)) / out_alpha;
    [channel(0), channel(1), channel(2), out_alpha]
}

/// Every link drawn as a line of `intensity` between its two communities, then blurred
pub fn link_line_raster(
    graph: &CommunityGraph,
    width: usize,
    height: usize,
    intensity: f32,
    blur_radius: f32,
) -> Result<Raster<f32>> {
    check_resolution(width, height)?;
    if !intensity.is_finite() {
        return Err(TerrainError::invalid_parameter("line intensity must be finite"));
    }

    let mut raster = Raster::filled(width, height, 0.0f32);
    for link in graph.links() {
        let Some((first, second)) = graph.endpoints(link) else {
            continue;
        };
        let start = texel_of(first.position, width, height);
        let end = texel_of(second.position, width, height);
        draw_line(&mut raster, start, end, intensity);
    }

    Ok(gaussian_blur(&raster, blur_radius))
}

/// Digital differential analyzer; texels outside the raster are dropped
fn draw_line(raster: &mut Raster<f32>, start: Vec2, end: Vec2, value: f32) {
    let delta = end - start;
    let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
    let step = delta / steps as f32;

    let mut point = start;
    for _ in 0..=steps {
        let (x, y) = (point.x.round(), point.y.round());
        if x >= 0.0 && y >= 0.0 && (x as usize) < raster.width() && (y as usize) < raster.height() {
            raster.set(x as usize, y as usize, value);
        }
        point += step;
    }
}

/// Texel index (fractional) whose centre is at `position`
fn texel_of(position: Vec2, width: usize, height: usize) -> Vec2 {
    Vec2::new(
        field_to_texel(position.x, width) - 0.5,
        field_to_texel(position.y, height) - 0.5,
    )
}

/// Texels whose centres can fall inside the field-space box `min..max`
fn texel_bounds(
    min: Vec2,
    max: Vec2,
    width: usize,
    height: usize,
) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
    let axis = |lo: f32, hi: f32, resolution: usize| {
        let first = (field_to_texel(lo, resolution) - 0.5).floor().max(0.0) as usize;
        let last = (field_to_texel(hi, resolution) - 0.5).ceil() as isize;
        let end = (last + 1).clamp(0, resolution as isize) as usize;
        first.min(end)..end
    };
    (axis(min.x, max.x, width), axis(min.y, max.y, height))
}

fn check_resolution(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(TerrainError::invalid_parameter(format!(
            "raster resolution must be non-zero, got {}x{}",
            width, height
        )));
    }
    Ok(())
}
