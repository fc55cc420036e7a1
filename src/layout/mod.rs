//! Force-directed layout: models, simulator, and model selection.
//!
//! The supported force models form a small closed set, so dispatch is a
//! tagged enum rather than trait objects. The hot loop stays
//! branch-predictable and free of per-node indirection.

mod networkx;
mod simulator;
mod spring;

use std::fmt;
use std::str::FromStr;

pub(crate) use networkx::NetworkXModel;
pub(crate) use simulator::Simulator;
pub(crate) use spring::SpringModel;

use crate::Point;
use crate::error::LayoutError;
use crate::graph::GraphModel;
use crate::spatial::QuadTree;

/// Distances below this are clamped before entering a force law.
pub(crate) const MIN_DISTANCE: f32 = 0.01;

/// Which force model drives the simulation.
///
/// Resolved once from the caller's string token before any graph work; the
/// token set is closed and unknown tokens fail with
/// [`LayoutError::UnknownModel`] instead of silently defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Spring/repulsion model: non-neighbors repel, neighbors feel a
    /// weighted spring. The default.
    Spring,
    /// Fruchterman–Reingold variant matching networkx `spring_layout`.
    NetworkX,
}

impl ModelKind {
    /// Canonical token for this model.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring_model",
            Self::NetworkX => "networkx_model",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = LayoutError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "default" | "spring_model" => Ok(Self::Spring),
            "networkx_model" => Ok(Self::NetworkX),
            other => Err(LayoutError::UnknownModel(other.to_string())),
        }
    }
}

/// Mutable position state for one run, in SoA layout.
///
/// Exclusively owned by the simulator while it runs; converted into the
/// caller-facing `Vec<Point>` when the run finishes.
pub(crate) struct PositionBuffer {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
}

impl PositionBuffer {
    #[inline]
    pub fn get(&self, node: usize) -> (f32, f32) {
        (self.x[node], self.y[node])
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.x
            .into_iter()
            .zip(self.y)
            .map(|(x, y)| Point::new(x, y))
            .collect()
    }
}

/// Closed dispatch over the force model variants.
///
/// Each variant carries its own cooling state; `cool` runs once per
/// iteration before the displacement pass.
pub(crate) enum ForceModel {
    Spring(SpringModel),
    NetworkX(NetworkXModel),
}

impl ForceModel {
    pub fn new(kind: ModelKind, graph: &GraphModel, iterations: usize) -> Self {
        match kind {
            ModelKind::Spring => Self::Spring(SpringModel::new(iterations)),
            ModelKind::NetworkX => {
                Self::NetworkX(NetworkXModel::new(graph.node_count(), iterations))
            }
        }
    }

    /// Advance the cooling schedule by one iteration.
    pub fn cool(&mut self) {
        match self {
            Self::Spring(model) => model.cool(),
            Self::NetworkX(model) => model.cool(),
        }
    }

    /// Compute one node's displacement for this step.
    ///
    /// Reads the previous step's positions only; the caller owns applying
    /// the displacement, so the pass can run in parallel across nodes.
    #[inline]
    pub fn displacement(
        &self,
        graph: &GraphModel,
        positions: &PositionBuffer,
        tree: Option<&QuadTree>,
        node: usize,
    ) -> (f32, f32) {
        match self {
            Self::Spring(model) => model.displacement(graph, positions, tree, node),
            Self::NetworkX(model) => model.displacement(graph, positions, tree, node),
        }
    }
}

/// Deterministic unit vector for coincident points.
///
/// When two nodes share a position there is no direction to push along;
/// deriving one from the node indices keeps runs reproducible where a
/// random jitter would not be.
pub(crate) fn jitter_unit(a: usize, b: usize) -> (f32, f32) {
    let mix = a
        .wrapping_mul(0x9E37_79B9)
        .wrapping_add(b.wrapping_mul(0x85EB_CA6B));
    let angle = (mix % 628) as f32 * 0.01;
    (angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tokens() {
        assert_eq!("default".parse::<ModelKind>().unwrap(), ModelKind::Spring);
        assert_eq!(
            "spring_model".parse::<ModelKind>().unwrap(),
            ModelKind::Spring
        );
        assert_eq!(
            "networkx_model".parse::<ModelKind>().unwrap(),
            ModelKind::NetworkX
        );
    }

    #[test]
    fn test_unknown_token_fails() {
        let err = "gravity".parse::<ModelKind>().unwrap_err();
        match err {
            LayoutError::UnknownModel(token) => assert_eq!(token, "gravity"),
            other => panic!("expected UnknownModel, got {other:?}"),
        }
    }

    #[test]
    fn test_token_round_trip() {
        for kind in [ModelKind::Spring, ModelKind::NetworkX] {
            assert_eq!(kind.as_str().parse::<ModelKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_jitter_unit_is_deterministic_and_unit_length() {
        let (x1, y1) = jitter_unit(3, 7);
        let (x2, y2) = jitter_unit(3, 7);
        assert_eq!((x1, y1), (x2, y2));
        assert!(((x1 * x1 + y1 * y1).sqrt() - 1.0).abs() < 1e-6);

        // Different pairs should usually get different directions.
        assert_ne!(jitter_unit(3, 7), jitter_unit(7, 3));
    }
}
