/// Guard for divisions by lengths, areas and size spans
pub const EPSILON: f32 = 1e-6;

/// Lowest value a ridge may take, so terrain never collapses into a zero-height seam
pub const MIN_RIDGE_HEIGHT: f32 = 0.01;

/// Sunflower boundary smoothing; higher values put more points on the rim
pub const SUNFLOWER_ALPHA: f32 = 2.0;

/// Encoded tangent-space "up" normal, `(0, 1, 0)` remapped into `[0, 1]`
pub const ENCODED_UP_NORMAL: [f32; 3] = [0.5, 1.0, 0.5];

pub const TRANSPARENT: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

pub const COMMUNITY_COLORS: &[[f32; 4]] = &[
    [0.90, 0.10, 0.29, 1.0], // red
    [0.24, 0.71, 0.29, 1.0], // green
    [1.00, 0.88, 0.10, 1.0], // yellow
    [0.00, 0.51, 0.78, 1.0], // blue
    [0.96, 0.51, 0.19, 1.0], // orange
    [0.57, 0.12, 0.71, 1.0], // purple
    [0.27, 0.94, 0.94, 1.0], // cyan
    [0.94, 0.20, 0.90, 1.0], // magenta
    [0.82, 0.96, 0.24, 1.0], // lime
    [0.98, 0.75, 0.83, 1.0], // pink
];
