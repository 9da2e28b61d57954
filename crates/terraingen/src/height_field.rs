//! Scalar terrain field driven by community sizes and link weights.
//!
//! Every link raises a ridge between its two communities and every isolated
//! community raises a single peak. The field value at a point is the largest
//! of these contributions, never their sum, so nearby large features dominate
//! instead of piling up.

use crate::config::HeightFieldConfig;
use crate::constants::{EPSILON, MIN_RIDGE_HEIGHT};
use crate::error::{Result, TerrainError};
use crate::graph::CommunityGraph;
use crate::tools::{project_onto_segment, sagged_lerp};
use glam::Vec2;

/// Normalisation maxima of the current graph.
///
/// Recompute with [`FieldMaxes::from_graph`] whenever nodes or links change and
/// hand the result to [`HeightField::with_maxes`]; the field never refreshes
/// them on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMaxes {
    pub max_link_weight: f32,
    pub max_node_size: f32,
}

impl FieldMaxes {
    /// Single pass over every node and link
    pub fn from_graph(graph: &CommunityGraph) -> Self {
        let max_node_size = graph.nodes().iter().map(|n| n.size).fold(0.0, f32::max);
        let max_link_weight = graph.links().iter().map(|l| l.weight).fold(0.0, f32::max);
        Self {
            max_link_weight,
            max_node_size,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Ridge {
    start: Vec2,
    end: Vec2,
    start_size: f32,
    end_size: f32,
    weight: f32,
}

#[derive(Debug, Clone, Copy)]
struct Peak {
    position: Vec2,
    size: f32,
}

#[derive(Debug, Clone)]
pub struct HeightField {
    config: HeightFieldConfig,
    maxes: FieldMaxes,
    ridges: Vec<Ridge>,
    peaks: Vec<Peak>,
}

impl HeightField {
    /// Field over `graph` with freshly computed maxima
    pub fn new(config: &HeightFieldConfig, graph: &CommunityGraph) -> Result<Self> {
        Self::with_maxes(config, graph, FieldMaxes::from_graph(graph))
    }

    pub fn with_maxes(config: &HeightFieldConfig, graph: &CommunityGraph, maxes: FieldMaxes) -> Result<Self> {
        if !config.falloff_distance.is_finite() || config.falloff_distance <= 0.0 {
            return Err(TerrainError::invalid_parameter(format!(
                "falloff distance must be > 0, got {}",
                config.falloff_distance
            )));
        }

        let ridges = graph
            .links()
            .iter()
            .filter_map(|link| {
                let (first, second) = graph.endpoints(link)?;
                Some(Ridge {
                    start: first.position,
                    end: second.position,
                    start_size: first.size,
                    end_size: second.size,
                    weight: link.weight,
                })
            })
            .collect();

        let peaks = graph
            .isolated_nodes()
            .map(|node| Peak {
                position: node.position,
                size: node.size,
            })
            .collect();

        Ok(Self {
            config: config.clone(),
            maxes,
            ridges,
            peaks,
        })
    }

    pub fn maxes(&self) -> FieldMaxes {
        self.maxes
    }

    /// `(size - 1) / (max_node_size - 1)` in `[0, 1]`.
    ///
    /// With every community of size 1 the span is zero and every size counts
    /// as the largest. Graphs whose largest community is below 1 normalize by
    /// `size / max_node_size` instead, keeping the largest at 1.
    pub fn normalized_size(&self, size: f32) -> f32 {
        let span = self.maxes.max_node_size - 1.0;
        if span.abs() < EPSILON {
            return 1.0;
        }
        if span < 0.0 {
            return (size / self.maxes.max_node_size).clamp(0.0, 1.0);
        }
        ((size - 1.0) / span).clamp(0.0, 1.0)
    }

    /// Link weight relative to the number of possible member pairs
    pub fn relative_weight(&self, weight: f32, size1: f32, size2: f32) -> f32 {
        let pairs = size1 * size2;
        if pairs < EPSILON {
            return 0.0;
        }
        (weight / pairs).clamp(0.0, 1.0)
    }

    /// Height of a ridge at `t` along it (0 at the first community, 1 at the second)
    pub fn ridge_height(&self, size1: f32, size2: f32, weight: f32, t: f32) -> f32 {
        let height1 = self.config.peak_height.evaluate(self.normalized_size(size1));
        let height2 = self.config.peak_height.evaluate(self.normalized_size(size2));
        let slack = self
            .config
            .slack
            .evaluate(self.relative_weight(weight, size1, size2));

        sagged_lerp(height1, height2, 1.0 - slack, t).max(MIN_RIDGE_HEIGHT)
    }

    /// Peak height of a community of this size, before any falloff
    pub fn peak_height_for(&self, size: f32) -> f32 {
        self.config.peak_height.evaluate(self.normalized_size(size))
    }

    /// Influence radius of a community of this size
    pub fn radius_from_node_size(&self, size: f32) -> f32 {
        if self.maxes.max_node_size < EPSILON {
            return 0.0;
        }
        size / self.maxes.max_node_size * self.config.falloff_distance
    }

    /// Field value at a point of `[-1, 1]²`, 0 outside every influence radius
    pub fn max_weight_at(&self, point: Vec2) -> f32 {
        let from_ridges = self.ridges.iter().map(|ridge| self.ridge_contribution(ridge, point));
        let from_peaks = self.peaks.iter().map(|peak| self.peak_contribution(peak, point));
        from_ridges.chain(from_peaks).fold(0.0, f32::max)
    }

    fn ridge_contribution(&self, ridge: &Ridge, point: Vec2) -> f32 {
        let projection = project_onto_segment(point, ridge.start, ridge.end);
        let degenerate = ridge.start.distance_squared(ridge.end) < EPSILON;

        let (dist, size, t) = if degenerate || projection.t < 0.0 {
            (point.distance(ridge.start), ridge.start_size, 0.0)
        } else if projection.t > 1.0 {
            (point.distance(ridge.end), ridge.end_size, 1.0)
        } else {
            (
                projection.dist_sq.sqrt(),
                ridge.start_size.min(ridge.end_size),
                projection.t,
            )
        };

        let falloff = self.falloff(dist, size);
        if falloff <= 0.0 {
            return 0.0;
        }
        falloff * self.ridge_height(ridge.start_size, ridge.end_size, ridge.weight, t)
    }

    fn peak_contribution(&self, peak: &Peak, point: Vec2) -> f32 {
        let falloff = self.falloff(point.distance(peak.position), peak.size);
        if falloff <= 0.0 {
            return 0.0;
        }
        falloff * self.ridge_height(peak.size, peak.size, self.maxes.max_link_weight, 0.0)
    }

    /// Falloff shape at `dist`, the radius scaling with the community size
    fn falloff(&self, dist: f32, size: f32) -> f32 {
        if size < EPSILON {
            return 0.0;
        }
        let ratio = 1.0 - dist / self.config.falloff_distance * self.maxes.max_node_size / size;
        if ratio <= 0.0 {
            return 0.0;
        }
        self.config.falloff_shape.evaluate(ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::ResponseCurve;
    use crate::graph::{CommunityLink, CommunityNode};
    use rstest::rstest;

    fn node(id: u32, x: f32, y: f32, size: f32) -> CommunityNode {
        CommunityNode {
            id,
            position: Vec2::new(x, y),
            size,
            color: [1.0; 4],
        }
    }

    fn link(source: u32, target: u32, weight: f32) -> CommunityLink {
        CommunityLink {
            source,
            target,
            weight,
        }
    }

    fn identity_config(falloff_distance: f32) -> HeightFieldConfig {
        HeightFieldConfig {
            falloff_distance,
            falloff_shape: ResponseCurve::identity(),
            peak_height: ResponseCurve::identity(),
            slack: ResponseCurve::identity(),
        }
    }

    fn two_communities() -> CommunityGraph {
        CommunityGraph::new(
            vec![node(1, -0.5, 0.0, 8.0), node(2, 0.5, 0.0, 4.0)],
            vec![link(1, 2, 2.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_maxes_bound_every_node_and_link() {
        let graph = CommunityGraph::new(
            vec![node(1, 0.0, 0.0, 3.0), node(2, 0.5, 0.0, 9.0), node(3, -0.5, 0.0, 2.0)],
            vec![link(1, 2, 4.0), link(2, 3, 11.0)],
        )
        .unwrap();
        let maxes = FieldMaxes::from_graph(&graph);
        assert_eq!(maxes.max_node_size, 9.0);
        assert_eq!(maxes.max_link_weight, 11.0);
    }

    #[test]
    fn test_ridge_ends_match_normalized_peaks() {
        let field = HeightField::new(&identity_config(1.0), &two_communities()).unwrap();

        // sizes normalize as (size - 1) / (8 - 1)
        let at_large = field.ridge_height(8.0, 4.0, 2.0, 0.0);
        let at_small = field.ridge_height(8.0, 4.0, 2.0, 1.0);
        assert!((at_large - 1.0).abs() < 1e-4, "got {}", at_large);
        assert!((at_small - 3.0 / 7.0).abs() < 1e-4, "got {}", at_small);

        let mid = field.ridge_height(8.0, 4.0, 2.0, 0.5);
        assert!(mid < (at_large + at_small) / 2.0);
        assert!(mid >= MIN_RIDGE_HEIGHT);
    }

    #[rstest]
    #[case(5.0, 1.0, 0.1)]
    #[case(8.0, 0.0, 0.3)]
    #[case(2.0, 3.5, 0.45)]
    #[case(6.0, 36.0, 0.9)]
    fn test_ridge_symmetric_for_equal_sizes(#[case] size: f32, #[case] weight: f32, #[case] t: f32) {
        let field = HeightField::new(&HeightFieldConfig::default(), &two_communities()).unwrap();
        let forward = field.ridge_height(size, size, weight, t);
        let backward = field.ridge_height(size, size, weight, 1.0 - t);
        assert!((forward - backward).abs() < 1e-5);
    }

    #[test]
    fn test_relative_weight_monotone() {
        let field = HeightField::new(&identity_config(1.0), &two_communities()).unwrap();
        assert!(field.relative_weight(4.0, 4.0, 8.0) > field.relative_weight(2.0, 4.0, 8.0));
        assert!(field.relative_weight(2.0, 2.0, 8.0) > field.relative_weight(2.0, 4.0, 8.0));
        assert_eq!(field.relative_weight(1.0, 0.0, 8.0), 0.0);
    }

    #[test]
    fn test_uniform_sizes_do_not_produce_nan() {
        let graph = CommunityGraph::new(
            vec![node(1, -0.3, 0.0, 1.0), node(2, 0.3, 0.0, 1.0), node(3, 0.0, 0.6, 1.0)],
            vec![link(1, 2, 1.0)],
        )
        .unwrap();
        let field = HeightField::new(&identity_config(0.5), &graph).unwrap();

        assert_eq!(field.normalized_size(1.0), 1.0);
        for i in 0..=20 {
            let value = field.max_weight_at(Vec2::new(i as f32 / 10.0 - 1.0, 0.0));
            assert!(value.is_finite() && value >= 0.0);
        }
    }

    #[test]
    fn test_field_is_zero_out_of_range() {
        let graph = CommunityGraph::new(
            vec![node(1, -0.2, 0.0, 2.0), node(2, 0.2, 0.0, 6.0), node(3, 0.0, 0.5, 3.0)],
            vec![link(1, 2, 3.0)],
        )
        .unwrap();
        let falloff = 0.1;
        let field = HeightField::new(&identity_config(falloff), &graph).unwrap();
        let reach = falloff * 6.0 / 2.0;

        for p in [Vec2::new(-0.2 - reach * 1.01, 0.0), Vec2::new(0.9, -0.9), Vec2::new(0.0, -0.31)] {
            assert_eq!(field.max_weight_at(p), 0.0, "at {:?}", p);
        }
        for i in 0..100 {
            let p = Vec2::new((i as f32 * 0.37).sin(), (i as f32 * 0.91).cos());
            assert!(field.max_weight_at(p) >= 0.0);
        }
    }

    #[test]
    fn test_field_is_zero_out_of_range_with_raised_falloff_curve() {
        let graph = CommunityGraph::new(vec![node(1, 0.0, 0.0, 5.0)], vec![]).unwrap();
        let config = HeightFieldConfig {
            falloff_shape: ResponseCurve::linear(0.0, 0.2, 1.0, 1.0),
            ..identity_config(0.2)
        };
        let field = HeightField::new(&config, &graph).unwrap();

        assert_eq!(field.max_weight_at(Vec2::new(0.95, 0.95)), 0.0);
        assert_eq!(field.max_weight_at(Vec2::new(0.2, 0.0)), 0.0);
        assert!(field.max_weight_at(Vec2::new(0.19, 0.0)) > 0.0);
    }

    #[test]
    fn test_sub_unit_sizes_keep_their_order() {
        let graph = CommunityGraph::new(
            vec![node(1, -0.3, 0.0, 0.5), node(2, 0.3, 0.0, 0.1)],
            vec![link(1, 2, 0.02)],
        )
        .unwrap();
        let field = HeightField::new(&identity_config(0.4), &graph).unwrap();

        assert_eq!(field.normalized_size(0.5), 1.0);
        assert!(field.normalized_size(0.1) < field.normalized_size(0.5));
        assert!((field.normalized_size(0.1) - 0.2).abs() < 1e-6);
        assert!(field.peak_height_for(0.1) < field.peak_height_for(0.5));
    }

    #[test]
    fn test_isolated_node_peak() {
        let graph = CommunityGraph::new(vec![node(1, 0.0, 0.0, 5.0)], vec![]).unwrap();
        let falloff = 0.4;
        let field = HeightField::new(&identity_config(falloff), &graph).unwrap();

        assert!((field.radius_from_node_size(5.0) - falloff).abs() < 1e-6);
        let centre = field.max_weight_at(Vec2::ZERO);
        assert!(centre >= MIN_RIDGE_HEIGHT);
        assert!(centre >= field.max_weight_at(Vec2::new(falloff * 1.01, 0.0)));
        assert_eq!(field.max_weight_at(Vec2::new(falloff * 1.01, 0.0)), 0.0);
    }

    #[test]
    fn test_linked_nodes_are_not_peaks() {
        let graph = two_communities();
        let field = HeightField::new(&identity_config(0.2), &graph).unwrap();
        assert!(field.peaks.is_empty());
        assert_eq!(field.ridges.len(), 1);
    }

    #[test]
    fn test_blending_takes_maximum_not_sum() {
        let nodes = vec![
            node(1, -0.5, 0.0, 6.0),
            node(2, 0.5, 0.0, 6.0),
            node(3, 0.0, -0.5, 6.0),
            node(4, 0.0, 0.5, 6.0),
        ];
        let both = CommunityGraph::new(nodes.clone(), vec![link(1, 2, 10.0), link(3, 4, 30.0)]).unwrap();
        let first = CommunityGraph::new(nodes.clone(), vec![link(1, 2, 10.0)]).unwrap();
        let second = CommunityGraph::new(nodes, vec![link(3, 4, 30.0)]).unwrap();

        let config = identity_config(0.3);
        let maxes = FieldMaxes::from_graph(&both);
        let field = HeightField::with_maxes(&config, &both, maxes).unwrap();
        let only_first = HeightField::with_maxes(&config, &first, maxes).unwrap();
        let only_second = HeightField::with_maxes(&config, &second, maxes).unwrap();

        for p in [Vec2::ZERO, Vec2::new(0.05, 0.02), Vec2::new(-0.1, 0.1)] {
            let expected = only_first.max_weight_at(p).max(only_second.max_weight_at(p));
            assert!((field.max_weight_at(p) - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_length_link_behaves_like_a_point() {
        let graph = CommunityGraph::new(
            vec![node(1, 0.1, 0.1, 4.0), node(2, 0.1, 0.1, 4.0)],
            vec![link(1, 2, 1.0)],
        )
        .unwrap();
        let field = HeightField::new(&identity_config(0.3), &graph).unwrap();
        let value = field.max_weight_at(Vec2::new(0.1, 0.1));
        assert!(value.is_finite() && value > 0.0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f32::NAN)]
    fn test_rejects_bad_falloff_distance(#[case] falloff: f32) {
        let result = HeightField::new(&identity_config(falloff), &two_communities());
        assert!(matches!(result, Err(TerrainError::InvalidParameter(_))));
    }
}
