//! Default spring/repulsion force model.
//!
//! Every pair of unconnected nodes repels with magnitude `min(1/d², 1)`;
//! connected nodes feel a spring pulling them toward a rest length of 1.0,
//! scaled by the summed edge weight. The net force is applied with a
//! damped step: its magnitude is capped at a step size that decays linearly
//! to zero over the run, which both prevents oscillation and lets the
//! movement-based convergence test fire once the system balances.

use super::{PositionBuffer, jitter_unit};
use crate::graph::GraphModel;
use crate::spatial::QuadTree;

const INITIAL_STEP: f32 = 0.1;
const REST_LENGTH: f32 = 1.0;

pub(crate) struct SpringModel {
    rest_length: f32,
    step: f32,
    decay: f32,
}

impl SpringModel {
    pub fn new(iterations: usize) -> Self {
        let decay = INITIAL_STEP / (iterations + 1) as f32;
        Self {
            rest_length: REST_LENGTH,
            // cool() runs before the first step, so start one notch high.
            step: INITIAL_STEP + decay,
            decay,
        }
    }

    pub fn cool(&mut self) {
        self.step -= self.decay;
    }

    pub fn displacement(
        &self,
        graph: &GraphModel,
        positions: &PositionBuffer,
        tree: Option<&QuadTree>,
        node: usize,
    ) -> (f32, f32) {
        let (x, y) = positions.get(node);

        // Repulsion from every other node.
        let (mut fx, mut fy) = match tree {
            Some(tree) => tree.accumulate(x, y, |dist, mass| mass * (dist * dist).recip().min(1.0)),
            None => {
                let mut fx = 0.0;
                let mut fy = 0.0;
                for other in 0..positions.len() {
                    if other == node {
                        continue;
                    }
                    let (ox, oy) = positions.get(other);
                    let dx = x - ox;
                    let dy = y - oy;
                    let dist_sq = dx * dx + dy * dy;
                    if dist_sq <= f32::EPSILON {
                        // Coincident pair: push along a reproducible
                        // direction at the clamped maximum magnitude.
                        let (ux, uy) = jitter_unit(node, other);
                        fx += ux;
                        fy += uy;
                        continue;
                    }
                    let dist = dist_sq.sqrt();
                    let f = dist_sq.recip().min(1.0);
                    fx += f * dx / dist;
                    fy += f * dy / dist;
                }
                (fx, fy)
            }
        };

        // Neighbors feel the spring instead of the repulsion: cancel the
        // repulsive term the all-pairs pass contributed for the pair, then
        // add the weighted spring force.
        for (other, weight) in graph.neighbors(node) {
            let (ox, oy) = positions.get(other);
            let dx = x - ox;
            let dy = y - oy;
            let dist_sq = dx * dx + dy * dy;
            let (ux, uy, dist, repulsion) = if dist_sq <= f32::EPSILON {
                let (ux, uy) = jitter_unit(node, other);
                (ux, uy, 0.0, 1.0)
            } else {
                let dist = dist_sq.sqrt();
                (dx / dist, dy / dist, dist, dist_sq.recip().min(1.0))
            };
            let stretch = 0.5 * weight * (dist - self.rest_length);
            fx -= (repulsion + stretch) * ux;
            fy -= (repulsion + stretch) * uy;
        }

        // Damped step: cap the move at the current step size.
        let norm = (fx * fx + fy * fy).sqrt();
        if norm <= f32::EPSILON {
            return (0.0, 0.0);
        }
        if norm > self.step {
            let scale = self.step / norm;
            (fx * scale, fy * scale)
        } else {
            (fx, fy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(points: &[(f32, f32)]) -> PositionBuffer {
        PositionBuffer {
            x: points.iter().map(|p| p.0).collect(),
            y: points.iter().map(|p| p.1).collect(),
        }
    }

    #[test]
    fn test_connected_pair_attracts_beyond_rest_length() {
        let graph = GraphModel::from_edges(2, vec![(0usize, 1usize)]).unwrap();
        let pos = positions(&[(0.0, 0.0), (2.0, 2.0)]);
        let model = SpringModel::new(1);

        let (dx, dy) = model.displacement(&graph, &pos, None, 0);
        assert!(dx > 0.0 && dy > 0.0, "node 0 should move toward node 1");
    }

    #[test]
    fn test_connected_pair_repels_below_rest_length() {
        let graph = GraphModel::from_edges(2, vec![(0usize, 1usize)]).unwrap();
        let pos = positions(&[(0.0, 0.0), (0.2, 0.2)]);
        let model = SpringModel::new(1);

        let (dx, dy) = model.displacement(&graph, &pos, None, 0);
        assert!(dx < 0.0 && dy < 0.0, "compressed spring should push back");
    }

    #[test]
    fn test_unconnected_pair_repels() {
        let graph = GraphModel::from_edges(2, Vec::<(usize, usize)>::new()).unwrap();
        let pos = positions(&[(0.0, 0.0), (1.0, 1.0)]);
        let model = SpringModel::new(1);

        let (dx, dy) = model.displacement(&graph, &pos, None, 0);
        assert!(dx < 0.0 && dy < 0.0, "node 0 should move away from node 1");
    }

    #[test]
    fn test_heavier_edge_pulls_harder() {
        let light = GraphModel::from_edges(2, vec![(0usize, 1usize, 1.0f32)]).unwrap();
        let heavy = GraphModel::from_edges(2, vec![(0usize, 1usize, 4.0f32)]).unwrap();
        let pos = positions(&[(0.0, 0.0), (3.0, 0.0)]);
        // Large step so the cap does not mask the difference.
        let model = SpringModel {
            rest_length: REST_LENGTH,
            step: 100.0,
            decay: 0.0,
        };

        let (light_dx, _) = model.displacement(&light, &pos, None, 0);
        let (heavy_dx, _) = model.displacement(&heavy, &pos, None, 0);
        assert!(heavy_dx > light_dx);
    }

    #[test]
    fn test_coincident_nodes_stay_finite() {
        let graph = GraphModel::from_edges(2, Vec::<(usize, usize)>::new()).unwrap();
        let pos = positions(&[(1.0, 1.0), (1.0, 1.0)]);
        let model = SpringModel::new(1);

        let (dx, dy) = model.displacement(&graph, &pos, None, 0);
        assert!(dx.is_finite() && dy.is_finite());
        assert!(dx != 0.0 || dy != 0.0, "coincident nodes must separate");
    }

    #[test]
    fn test_displacement_capped_at_step_size() {
        let graph = GraphModel::from_edges(2, Vec::<(usize, usize)>::new()).unwrap();
        let pos = positions(&[(0.0, 0.0), (0.05, 0.0)]);
        let mut model = SpringModel::new(1);
        model.cool();

        let (dx, dy) = model.displacement(&graph, &pos, None, 0);
        let norm = (dx * dx + dy * dy).sqrt();
        assert!(norm <= INITIAL_STEP + 1e-6);
    }

    #[test]
    fn test_tree_and_pairwise_agree() {
        let points: Vec<(f32, f32)> = (0..40)
            .map(|i| {
                let a = i as f32 * 0.7;
                (a.cos() * (1.0 + i as f32 * 0.1), a.sin() * (1.0 + i as f32 * 0.1))
            })
            .collect();
        let graph =
            GraphModel::from_edges(40, (0usize..39).map(|i| (i, i + 1))).unwrap();
        let pos = positions(&points);
        let model = SpringModel::new(1);

        let mut tree = QuadTree::new(0.0);
        tree.rebuild(&pos.x, &pos.y);

        for node in [0, 13, 39] {
            let (ex, ey) = model.displacement(&graph, &pos, None, node);
            let (tx, ty) = model.displacement(&graph, &pos, Some(&tree), node);
            assert!((ex - tx).abs() < 1e-4, "node {node}: {ex} vs {tx}");
            assert!((ey - ty).abs() < 1e-4, "node {node}: {ey} vs {ty}");
        }
    }
}
