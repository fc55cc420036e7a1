//! Graph model: topology plus the adjacency index used by the force passes.
//!
//! The model is immutable after construction. Topology lives in a petgraph
//! `UnGraph`; a CSR adjacency (offsets / targets / weights) is derived from
//! it once so neighbor iteration during simulation is O(1) amortized with no
//! hashing in the hot loop.

use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::edge::Edge;
use crate::error::LayoutError;

/// Immutable graph representation: node count, edges, adjacency index.
///
/// Invariant: every edge endpoint is within `[0, node_count)` and every
/// weight is finite and positive. Violating input fails construction, so
/// the simulation never sees a partial graph.
///
/// Multi-edges are kept in the topology but merged in the adjacency (their
/// weights sum, making parallel edges cumulatively stronger springs).
/// Self-loops are kept in the topology but excluded from the adjacency,
/// which makes their net force contribution exactly zero.
#[derive(Debug)]
pub struct GraphModel {
    node_count: usize,
    graph: UnGraph<(), f32>,
    /// CSR row offsets, `node_count + 1` entries.
    offsets: Vec<usize>,
    /// Neighbor indices, sorted within each row.
    targets: Vec<u32>,
    /// Summed edge weight per distinct neighbor.
    weights: Vec<f32>,
}

impl GraphModel {
    /// Build a model from a declared node count and any edge source.
    ///
    /// The edge source is consumed exactly once, in order, so lazy
    /// single-pass iterators are fine; the edges are materialized into the
    /// model in one O(m) pass. Construction is O(n + m log d) overall where
    /// d is the maximum degree.
    ///
    /// # Errors
    ///
    /// Fails on the first edge with an endpoint outside `[0, node_count)`
    /// or a non-finite / non-positive weight, and on node counts beyond
    /// `i32::MAX` (the index space shared with the binary file format).
    pub fn from_edges<I, E>(node_count: usize, edges: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Edge>,
    {
        if node_count > i32::MAX as usize {
            return Err(LayoutError::InvalidNodeCount {
                value: node_count as i64,
            });
        }

        let mut graph = UnGraph::<(), f32>::with_capacity(node_count, 0);
        for _ in 0..node_count {
            graph.add_node(());
        }

        for (index, edge) in edges.into_iter().enumerate() {
            let edge: Edge = edge.into();
            for endpoint in [edge.source, edge.target] {
                if endpoint >= node_count {
                    return Err(LayoutError::InvalidEdge {
                        index,
                        endpoint: endpoint as i64,
                        node_count,
                    });
                }
            }
            if !edge.weight.is_finite() || edge.weight <= 0.0 {
                return Err(LayoutError::InvalidWeight {
                    index,
                    weight: edge.weight,
                });
            }
            graph.add_edge(
                NodeIndex::new(edge.source),
                NodeIndex::new(edge.target),
                edge.weight,
            );
        }

        let (offsets, targets, weights) = build_adjacency(&graph, node_count);
        debug!(
            "graph model built: {} nodes, {} edges, {} adjacency entries",
            node_count,
            graph.edge_count(),
            targets.len()
        );

        Ok(Self {
            node_count,
            graph,
            offsets,
            targets,
            weights,
        })
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of edges as supplied (multi-edges and self-loops included).
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate a node's distinct neighbors with their summed weights.
    #[inline]
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        let range = self.offsets[node]..self.offsets[node + 1];
        self.targets[range.clone()]
            .iter()
            .zip(&self.weights[range])
            .map(|(&target, &weight)| (target as usize, weight))
    }

    /// Number of distinct neighbors of a node.
    #[inline]
    pub fn degree(&self, node: usize) -> usize {
        self.offsets[node + 1] - self.offsets[node]
    }
}

/// Build the CSR adjacency from the petgraph topology.
///
/// Each undirected edge produces an entry on both endpoints' rows; rows are
/// sorted and duplicate neighbors merged with summed weights.
fn build_adjacency(
    graph: &UnGraph<(), f32>,
    node_count: usize,
) -> (Vec<usize>, Vec<u32>, Vec<f32>) {
    let mut offsets = Vec::with_capacity(node_count + 1);
    let mut targets = Vec::with_capacity(graph.edge_count() * 2);
    let mut weights = Vec::with_capacity(graph.edge_count() * 2);
    offsets.push(0);

    let mut incident: Vec<(u32, f32)> = Vec::new();
    for node in 0..node_count {
        let index = NodeIndex::new(node);
        incident.clear();
        for edge in graph.edges(index) {
            if edge.source() == edge.target() {
                continue; // self-loop: zero net force
            }
            let other = if edge.source() == index {
                edge.target()
            } else {
                edge.source()
            };
            incident.push((other.index() as u32, *edge.weight()));
        }
        incident.sort_unstable_by_key(|&(target, _)| target);

        let mut iter = incident.iter().copied();
        if let Some((mut current, mut weight)) = iter.next() {
            for (target, w) in iter {
                if target == current {
                    weight += w;
                } else {
                    targets.push(current);
                    weights.push(weight);
                    current = target;
                    weight = w;
                }
            }
            targets.push(current);
            weights.push(weight);
        }
        offsets.push(targets.len());
    }

    (offsets, targets, weights)
}
