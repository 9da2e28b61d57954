use glam::Vec2;
use rand::Rng;
use rand::distr::Uniform;

use crate::constants::EPSILON;

pub fn generate_seed8() -> u32 {
    let mut rng = rand::rng();
    match Uniform::new(0u32, 100_000_000u32) {
        Ok(distribution) => rng.sample(distribution),
        Err(_) => 0,
    }
}

pub fn expand_seed64(code: u32) -> u64 {
    splitmix64(code as u64)
}

pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

const TWO_SQRT_SIX: f64 = 4.898_979_485_566_356;

/// Interpolates from `first` to `second` along a hanging chain.
///
/// The chain is a catenary through `(0, first)` and `(1, second)` whose arc
/// length is `1 + sag`, so it dips below the straight line in the middle. For a
/// negligible sag (or if the catenary parameters cannot be solved in finite
/// arithmetic) this is a plain lerp.
pub fn sagged_lerp(first: f32, second: f32, sag: f32, t: f32) -> f32 {
    if sag < 1e-4 {
        return lerp(first, second, t);
    }

    let (first, second, sag, t) = (first as f64, second as f64, sag as f64, t as f64);
    let s = 1.0 + sag;
    let v = second - first;

    let a = 1.0 / (TWO_SQRT_SIX * ((s * s + v * v).sqrt() - 1.0).sqrt());
    let e = (1.0 / a).exp();
    let root = (v * v + a * a * (1.0 - e).powi(2) / e).sqrt();
    let j = -a * ((first - second - root) / (a * (1.0 - e))).ln();
    let k = first - a * (-j / a).cosh();
    let value = a * ((t - j) / a).cosh() + k;

    if value.is_finite() {
        value as f32
    } else {
        lerp(first as f32, second as f32, t as f32)
    }
}

/// Projection of a point onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Position along `start -> end`; 0 at start, 1 at end, unclamped
    pub t: f32,
    /// Squared distance to the closest point of the segment
    pub dist_sq: f32,
}

pub fn project_onto_segment(point: Vec2, start: Vec2, end: Vec2) -> SegmentProjection {
    let along = end - start;
    let len_sq = along.length_squared();

    // a zero-length segment behaves like its start point
    if len_sq < EPSILON {
        return SegmentProjection {
            t: 0.0,
            dist_sq: point.distance_squared(start),
        };
    }

    let t = (point - start).dot(along) / len_sq;
    let closest = if t < 0.0 {
        start
    } else if t > 1.0 {
        end
    } else {
        start + along * t
    };

    SegmentProjection {
        t,
        dist_sq: point.distance_squared(closest),
    }
}
