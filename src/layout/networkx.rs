//! Fruchterman–Reingold model matching networkx `spring_layout`.
//!
//! All pairs contribute a repulsive displacement `Δ · k²/d²` and every edge
//! an attractive `Δ · w·d/k`, with `k = sqrt(1/n)` the optimal pairwise
//! distance and distances clamped to 0.01. The summed displacement is
//! normalized to the current temperature, which decays linearly to zero
//! over the run and gives this model its characteristic tight clustering.

use super::{MIN_DISTANCE, PositionBuffer};
use crate::graph::GraphModel;
use crate::spatial::QuadTree;

const INITIAL_TEMPERATURE: f32 = 0.1;

pub(crate) struct NetworkXModel {
    /// Optimal distance between nodes.
    k: f32,
    /// Current temperature.
    t: f32,
    /// Temperature decrease per iteration.
    dt: f32,
}

impl NetworkXModel {
    pub fn new(node_count: usize, iterations: usize) -> Self {
        let k = (1.0 / node_count.max(1) as f32).sqrt();
        let dt = INITIAL_TEMPERATURE / (iterations + 1) as f32;
        Self {
            k,
            // cool() runs before the first step, so start one notch high.
            t: INITIAL_TEMPERATURE + dt,
            dt,
        }
    }

    pub fn cool(&mut self) {
        self.t -= self.dt;
    }

    pub fn displacement(
        &self,
        graph: &GraphModel,
        positions: &PositionBuffer,
        tree: Option<&QuadTree>,
        node: usize,
    ) -> (f32, f32) {
        let (x, y) = positions.get(node);
        let k_sq = self.k * self.k;

        // Repulsion from every other node: Δ · k²/d².
        let (mut dx_sum, mut dy_sum) = match tree {
            Some(tree) => tree.accumulate(x, y, |dist, mass| {
                let clamped = dist.max(MIN_DISTANCE);
                mass * dist * k_sq / (clamped * clamped)
            }),
            None => {
                let mut dx_sum = 0.0;
                let mut dy_sum = 0.0;
                for other in 0..positions.len() {
                    if other == node {
                        continue;
                    }
                    let (ox, oy) = positions.get(other);
                    let dx = x - ox;
                    let dy = y - oy;
                    let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                    let f = k_sq / (dist * dist);
                    dx_sum += dx * f;
                    dy_sum += dy * f;
                }
                (dx_sum, dy_sum)
            }
        };

        // Attraction along edges: Δ · w·d/k toward each neighbor.
        for (other, weight) in graph.neighbors(node) {
            let (ox, oy) = positions.get(other);
            let dx = x - ox;
            let dy = y - oy;
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let f = weight * dist / self.k;
            dx_sum -= dx * f;
            dy_sum -= dy * f;
        }

        // Move by one temperature-length step in the net direction.
        let length = (dx_sum * dx_sum + dy_sum * dy_sum)
            .sqrt()
            .max(MIN_DISTANCE);
        (dx_sum * self.t / length, dy_sum * self.t / length)
    }
}
