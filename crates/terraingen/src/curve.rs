use crate::error::{Result, TerrainError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Linear,
    /// Smoothstep easing between neighbouring keys, keeps monotone keys monotone
    Smooth,
}

/// Response curve mapping a normalized ratio to a value.
///
/// Keys are kept sorted by time. Inputs before the first key or after the last
/// key evaluate to that key's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveFile")]
pub struct ResponseCurve {
    interpolation: Interpolation,
    keys: Vec<Keyframe>,
}

/// Unvalidated curve as written in a config file
#[derive(Deserialize)]
struct CurveFile {
    #[serde(default)]
    interpolation: Interpolation,
    keys: Vec<Keyframe>,
}

impl TryFrom<CurveFile> for ResponseCurve {
    type Error = TerrainError;

    fn try_from(file: CurveFile) -> Result<Self> {
        Self::from_keys(file.keys.into_iter().map(|k| (k.time, k.value)), file.interpolation)
    }
}

impl ResponseCurve {
    /// Straight line between two keys
    pub fn linear(time_start: f32, value_start: f32, time_end: f32, value_end: f32) -> Self {
        let mut keys = vec![
            Keyframe {
                time: time_start,
                value: value_start,
            },
            Keyframe {
                time: time_end,
                value: value_end,
            },
        ];
        sort_keys(&mut keys);
        Self {
            keys,
            interpolation: Interpolation::Linear,
        }
    }

    /// `f(t) = t` on `[0, 1]`
    pub fn identity() -> Self {
        Self::linear(0.0, 0.0, 1.0, 1.0)
    }

    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![Keyframe { time: 0.0, value }],
            interpolation: Interpolation::Linear,
        }
    }

    pub fn from_keys(
        keys: impl IntoIterator<Item = (f32, f32)>,
        interpolation: Interpolation,
    ) -> Result<Self> {
        let mut keys: Vec<Keyframe> = keys
            .into_iter()
            .map(|(time, value)| Keyframe { time, value })
            .collect();

        if keys.is_empty() {
            return Err(TerrainError::invalid_parameter("response curve needs at least one key"));
        }
        if keys.iter().any(|k| !k.time.is_finite() || !k.value.is_finite()) {
            return Err(TerrainError::invalid_parameter("response curve keys must be finite"));
        }

        sort_keys(&mut keys);
        Ok(Self {
            keys,
            interpolation,
        })
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if t.is_nan() || t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // first key with time > t; exists because t < last.time
        let upper = self.keys.partition_point(|k| k.time <= t);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];

        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return b.value;
        }

        let u = (t - a.time) / span;
        let u = match self.interpolation {
            Interpolation::Linear => u,
            Interpolation::Smooth => u * u * (3.0 - 2.0 * u),
        };
        a.value + (b.value - a.value) * u
    }
}

impl Default for ResponseCurve {
    fn default() -> Self {
        Self::identity()
    }
}

fn sort_keys(keys: &mut [Keyframe]) {
    keys.sort_by(|a, b| a.time.total_cmp(&b.time));
}
