//! Error types for graph ingestion and layout.
//!
//! Every error is detected during ingestion or model selection, before any
//! simulation work begins. A layout request either fully succeeds or fails;
//! no partial layout is ever returned.

use thiserror::Error;

/// Errors surfaced by the layout entry points.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The node count is negative or does not fit the engine's index space.
    ///
    /// The binary file header stores the node count as a signed 32-bit
    /// integer, so counts above `i32::MAX` are rejected for in-memory input
    /// as well.
    #[error("invalid node count {value}: must be in 0..={max}", max = i32::MAX)]
    InvalidNodeCount {
        /// The count the caller supplied (or the file header contained).
        value: i64,
    },

    /// An edge endpoint is outside `[0, node_count)`.
    #[error("edge {index}: endpoint {endpoint} is out of range for {node_count} nodes")]
    InvalidEdge {
        /// Zero-based position of the edge in the input sequence or file.
        index: usize,
        /// The offending endpoint value.
        endpoint: i64,
        /// The declared node count.
        node_count: usize,
    },

    /// An edge weight is non-finite or not positive.
    #[error("edge {index}: weight {weight} must be a positive finite number")]
    InvalidWeight {
        /// Zero-based position of the edge in the input sequence or file.
        index: usize,
        /// The offending weight value.
        weight: f32,
    },

    /// The edge file does not match the `4 + 12 * m` byte layout.
    #[error("malformed edge file ({size} bytes): {reason}")]
    MalformedFile {
        /// Total file size in bytes.
        size: u64,
        /// What is wrong with the layout.
        reason: String,
    },

    /// The model token is not in the supported set.
    #[error(
        "unknown model {0:?}: expected \"default\", \"spring_model\", or \"networkx_model\""
    )]
    UnknownModel(String),

    /// The edge file could not be read.
    #[error("failed to read edge file")]
    Io(#[from] std::io::Error),
}
