//! Graph representation and edge ingestion.
//!
//! This module normalizes the supported edge inputs (in-memory sequences,
//! lazy single-pass iterators, binary files) into a [`GraphModel`]: a
//! petgraph topology plus a CSR adjacency index built once at construction
//! for fast neighbor iteration during simulation.

mod edge;
mod model;
mod reader;

pub use edge::Edge;
pub use model::GraphModel;
pub use reader::read_edge_file;
