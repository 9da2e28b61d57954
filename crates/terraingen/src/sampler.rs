use crate::constants::{EPSILON, SUNFLOWER_ALPHA};
use crate::graph::CommunityGraph;
use glam::Vec2;
use log::debug;
use std::f32::consts::PI;

/// Produces the planar point set the terrain is triangulated from
#[derive(Debug, Clone, Copy)]
pub struct PointSampler {
    pub disc_points: usize,
    pub ridge_subdivisions: usize,
}

impl PointSampler {
    pub fn new(disc_points: usize, ridge_subdivisions: usize) -> Self {
        Self {
            disc_points,
            ridge_subdivisions,
        }
    }

    pub fn sample(&self, graph: &CommunityGraph) -> Vec<Vec2> {
        let mut points = Vec::with_capacity(self.disc_points + graph.nodes().len());
        self.populate_disc(&mut points);
        self.populate_ridges(graph, &mut points);
        debug!(
            "Sampled {} terrain points ({} disc, {} ridge)",
            points.len(),
            self.disc_points,
            points.len() - self.disc_points
        );
        points
    }

    /// Sunflower (Vogel spiral) fill of the unit disc.
    ///
    /// The outermost `alpha * sqrt(n)` points are pinned to the rim so the disc
    /// boundary is well defined after triangulation.
    pub fn populate_disc(&self, points: &mut Vec<Vec2>) {
        let n = self.disc_points;
        if n == 0 {
            debug!("Disc fill skipped, no disc points requested");
            return;
        }

        let boundary = (SUNFLOWER_ALPHA * (n as f32).sqrt()).round() as usize;
        let phi = (5f32.sqrt() + 1.0) / 2.0;
        let inner = n as f32 - (boundary as f32 + 1.0) / 2.0;

        for k in 1..=n {
            let r = if k > n.saturating_sub(boundary) || inner <= 0.0 {
                1.0
            } else {
                ((k as f32 - 0.5) / inner).sqrt().min(1.0)
            };
            let theta = 2.0 * PI * k as f32 / (phi * phi);
            points.push(Vec2::new(r * theta.cos(), r * theta.sin()));
        }
    }

    /// Community positions plus points marching along every link.
    pub fn populate_ridges(&self, graph: &CommunityGraph, points: &mut Vec<Vec2>) {
        points.extend(graph.nodes().iter().map(|node| node.position));

        if self.ridge_subdivisions == 0 {
            debug!("Ridge sampling skipped, no ridge subdivisions requested");
            return;
        }

        for link in graph.links() {
            let Some((first, second)) = graph.endpoints(link) else {
                continue;
            };
            let delta = second.position - first.position;
            let length = delta.length();
            if length < EPSILON {
                continue;
            }

            let step = 1.0 / self.ridge_subdivisions as f32;
            let dir = delta / length;
            let mut i = 1;
            loop {
                let travelled = step * i as f32;
                if travelled >= length {
                    break;
                }
                points.push(first.position + dir * travelled);
                i += 1;
            }
        }
    }
}
