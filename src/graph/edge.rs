//! Edge input type and conversions.
//!
//! Edges connect two nodes identified by dense indices and optionally carry
//! a positive weight (default 1.0). Conversions from plain tuples let the
//! ingestion entry point accept vectors, single-pass iterators, and tuple
//! arrays uniformly.

use std::fmt;

/// An input edge `(source, target)` with an optional weight.
///
/// Endpoints are dense node indices; validation against the declared node
/// count happens at ingestion, not here. Edges are treated as undirected by
/// the force models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// First endpoint.
    pub source: usize,
    /// Second endpoint.
    pub target: usize,
    /// Spring strength multiplier. Must be finite and positive.
    pub weight: f32,
}

impl Edge {
    /// Create a new edge with the given weight.
    #[inline]
    pub fn new(source: usize, target: usize, weight: f32) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Create an edge with the default weight of 1.0.
    #[inline]
    pub fn unweighted(source: usize, target: usize) -> Self {
        Self::new(source, target, 1.0)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} -- {}, w={})", self.source, self.target, self.weight)
    }
}

impl From<(usize, usize)> for Edge {
    #[inline]
    fn from((source, target): (usize, usize)) -> Self {
        Self::unweighted(source, target)
    }
}

impl From<(usize, usize, f32)> for Edge {
    #[inline]
    fn from((source, target, weight): (usize, usize, f32)) -> Self {
        Self::new(source, target, weight)
    }
}

impl From<[usize; 2]> for Edge {
    #[inline]
    fn from([source, target]: [usize; 2]) -> Self {
        Self::unweighted(source, target)
    }
}
