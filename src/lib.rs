//! Force-directed graph layout.
//!
//! Computes 2D positions for the nodes of an undirected graph by simulating
//! physical forces: every pair of nodes repels, every edge pulls its
//! endpoints together, and the simulation runs until movement settles or an
//! iteration budget is hit. Runs are deterministic; the same graph and model
//! always produce the same layout.
//!
//! # Architecture
//!
//! - [`graph`]: edge inputs, the immutable [`GraphModel`] with its CSR
//!   adjacency, and the binary edge-file reader
//! - [`layout`]: the force models and the simulation driver
//! - [`spatial`]: Barnes–Hut quadtree used for repulsion on large graphs
//! - [`error`]: the [`LayoutError`] taxonomy
//!
//! # Example
//!
//! ```
//! use force_layout::layout_from_edge_list;
//!
//! let edges = vec![(0, 1), (1, 2), (2, 0), (2, 3)];
//! let positions = layout_from_edge_list(4, edges, "default")?;
//! assert_eq!(positions.len(), 4);
//! # Ok::<(), force_layout::LayoutError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod graph;
pub mod layout;
pub mod spatial;

pub use error::LayoutError;
pub use graph::{Edge, GraphModel, read_edge_file};
pub use layout::ModelKind;

use layout::Simulator;

/// A node position in the computed layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Lay out a graph given as an edge collection.
///
/// `edges` may be any iterable of edge-like values, owned or lazy; it is
/// consumed in a single pass. Endpoints must be `< node_count` and weights,
/// where given, finite and positive. `model` is a model token accepted by
/// [`ModelKind`]: `"default"`, `"spring_model"` or `"networkx_model"`.
///
/// Returns one [`Point`] per node, indexed by node id. An empty graph
/// yields an empty layout.
pub fn layout_from_edge_list<I, E>(
    node_count: usize,
    edges: I,
    model: &str,
) -> Result<Vec<Point>, LayoutError>
where
    I: IntoIterator<Item = E>,
    E: Into<Edge>,
{
    // Resolve the model token before consuming the edges so an unknown
    // token fails without touching the input.
    let kind: ModelKind = model.parse()?;
    let graph = GraphModel::from_edges(node_count, edges)?;
    Ok(Simulator::new(kind).run(&graph))
}

/// Lay out a graph stored in the binary edge-file format.
///
/// See [`read_edge_file`] for the format. `model` follows the same token
/// set as [`layout_from_edge_list`].
pub fn layout_from_edge_file(
    path: impl AsRef<Path>,
    model: &str,
) -> Result<Vec<Point>, LayoutError> {
    let kind: ModelKind = model.parse()?;
    let graph = read_edge_file(path.as_ref())?;
    Ok(Simulator::new(kind).run(&graph))
}
