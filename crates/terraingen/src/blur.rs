//! Gaussian blur approximated by three successive box blurs.
//!
//! Each box blur is separable (a horizontal pass, then a vertical pass) and
//! clamps at the raster edges, so the whole filter stays linear.

use crate::raster::Raster;

const BOX_PASSES: usize = 3;

pub fn gaussian_blur(source: &Raster<f32>, sigma: f32) -> Raster<f32> {
    let mut current = source.clone();
    if source.is_empty() {
        return current;
    }

    let mut scratch = source.clone();
    for size in boxes_for_gauss(sigma, BOX_PASSES) {
        let radius = (size - 1) / 2;
        if radius == 0 {
            continue;
        }
        box_blur_horizontal(&current, &mut scratch, radius);
        box_blur_vertical(&scratch, &mut current, radius);
    }
    current
}

/// Box widths whose successive application approximates a Gaussian of `sigma`
fn boxes_for_gauss(sigma: f32, passes: usize) -> Vec<usize> {
    let sigma = if sigma.is_finite() { sigma.max(0.0) } else { 0.0 };
    let n = passes as f32;

    let w_ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut wl = w_ideal.floor();
    if wl as usize % 2 == 0 {
        wl -= 1.0;
    }
    let wl = wl.max(1.0);
    let wu = wl + 2.0;

    let m_ideal = (12.0 * sigma * sigma - n * wl * wl - 4.0 * n * wl - 3.0 * n) / (-4.0 * wl - 4.0);
    let m = m_ideal.round().max(0.0) as usize;

    (0..passes)
        .map(|i| if i < m { wl as usize } else { wu as usize })
        .collect()
}

fn box_blur_horizontal(source: &Raster<f32>, target: &mut Raster<f32>, radius: usize) {
    let (width, height) = (source.width(), source.height());
    let r = radius as isize;
    let scale = 1.0 / (2 * radius + 1) as f32;

    for y in 0..height {
        let y = y as isize;
        let mut sum: f32 = (-r..=r).map(|k| source.get_clamped(k, y)).sum();
        for x in 0..width {
            let xi = x as isize;
            target.set(x, y as usize, sum * scale);
            sum += source.get_clamped(xi + r + 1, y) - source.get_clamped(xi - r, y);
        }
    }
}

fn box_blur_vertical(source: &Raster<f32>, target: &mut Raster<f32>, radius: usize) {
    let (width, height) = (source.width(), source.height());
    let r = radius as isize;
    let scale = 1.0 / (2 * radius + 1) as f32;

    for x in 0..width {
        let x = x as isize;
        let mut sum: f32 = (-r..=r).map(|k| source.get_clamped(x, k)).sum();
        for y in 0..height {
            let yi = y as isize;
            target.set(x as usize, y, sum * scale);
            sum += source.get_clamped(x, yi + r + 1) - source.get_clamped(x, yi - r);
        }
    }
}
