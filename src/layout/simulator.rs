//! The simulation driver.
//!
//! Owns the position buffer for the duration of a run: scatters initial
//! positions from a fixed seed, then repeatedly computes every node's
//! displacement in parallel against the previous step's positions, applies
//! the displacements, and stops on convergence or at the iteration budget.
//!
//! Internal tuning (not exposed at the public boundary):
//! - 500 iterations maximum,
//! - convergence when mean per-node movement drops below 1e-4,
//! - Barnes–Hut repulsion above 512 nodes with theta 0.5,
//! - initial scatter uniform in `[-0.5, 0.5)²` from a fixed seed.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::{ForceModel, ModelKind, PositionBuffer};
use crate::Point;
use crate::graph::GraphModel;
use crate::spatial::QuadTree;

const MAX_ITERATIONS: usize = 500;
const CONVERGENCE_THRESHOLD: f32 = 1e-4;
const BARNES_HUT_THRESHOLD: usize = 512;
const THETA: f32 = 0.5;
const SCATTER_SEED: u64 = 0x5EED_F06C;

enum StopReason {
    Converged(usize),
    IterationLimit,
}

pub(crate) struct Simulator {
    kind: ModelKind,
    iterations: usize,
}

impl Simulator {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            iterations: MAX_ITERATIONS,
        }
    }

    /// Run the simulation to completion and hand the positions out.
    pub fn run(&self, graph: &GraphModel) -> Vec<Point> {
        let n = graph.node_count();
        if n == 0 {
            return Vec::new();
        }

        let mut positions = scatter(n);
        if n == 1 {
            // No pairs to repel and no edges are possible; the scattered
            // position is the layout.
            return positions.into_points();
        }

        debug!(
            "simulating {} nodes, {} edges with {}",
            n,
            graph.edge_count(),
            self.kind
        );

        let mut model = ForceModel::new(self.kind, graph, self.iterations);
        let mut tree = (n >= BARNES_HUT_THRESHOLD).then(|| QuadTree::new(THETA));

        let mut reason = StopReason::IterationLimit;
        for iteration in 0..self.iterations {
            model.cool();
            if let Some(tree) = tree.as_mut() {
                tree.rebuild(&positions.x, &positions.y);
            }
            let tree = tree.as_ref();

            // One force pass over all nodes against the previous step's
            // positions; the collect is the barrier before any write.
            let displacements: Vec<(f32, f32)> = (0..n)
                .into_par_iter()
                .map(|node| model.displacement(graph, &positions, tree, node))
                .collect();

            let mut movement = 0.0f32;
            for (node, &(dx, dy)) in displacements.iter().enumerate() {
                positions.x[node] += dx;
                positions.y[node] += dy;
                movement += (dx * dx + dy * dy).sqrt();
            }

            if movement / n as f32 <= CONVERGENCE_THRESHOLD {
                reason = StopReason::Converged(iteration + 1);
                break;
            }
        }

        match reason {
            StopReason::Converged(iterations) => {
                debug!("layout converged after {iterations} iterations");
            }
            StopReason::IterationLimit => {
                debug!("layout stopped at the {}-iteration budget", self.iterations);
            }
        }

        recenter(&mut positions);
        positions.into_points()
    }
}

/// Seeded pseudo-random scatter in a small region around the origin.
fn scatter(n: usize) -> PositionBuffer {
    let mut rng = StdRng::seed_from_u64(SCATTER_SEED);
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for _ in 0..n {
        x.push(rng.random_range(-0.5..0.5));
        y.push(rng.random_range(-0.5..0.5));
    }
    PositionBuffer { x, y }
}

/// Shift the layout so its bounding box is centered on the origin.
fn recenter(positions: &mut PositionBuffer) {
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for (&x, &y) in positions.x.iter().zip(&positions.y) {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let center_x = (min_x + max_x) * 0.5;
    let center_y = (min_y + max_y) * 0.5;
    for x in &mut positions.x {
        *x -= center_x;
    }
    for y in &mut positions.y {
        *y -= center_y;
    }
}
