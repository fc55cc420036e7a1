//! Binary edge-file ingestion.
//!
//! File layout (little-endian, authoritative for interoperability):
//!
//! ```text
//! offset 0   : int32  node count (n)
//! offset 4.. : repeating 12-byte records:
//!                int32   u
//!                int32   v
//!                float32 weight
//! ```
//!
//! The file size must equal `4 + 12 * m` for some non-negative `m`; any
//! remainder (including a file truncated mid-record) is a malformed-file
//! error. The record count is implied by the file length.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use super::edge::Edge;
use super::model::GraphModel;
use crate::error::LayoutError;

const HEADER_BYTES: u64 = 4;
const RECORD_BYTES: u64 = 12;

/// Read a graph from a binary edge file.
///
/// The node count comes from the file header. The file handle is scoped to
/// this call and released on both success and failure.
///
/// # Errors
///
/// Returns [`LayoutError::MalformedFile`] when the size does not match the
/// record layout, [`LayoutError::InvalidNodeCount`] /
/// [`LayoutError::InvalidEdge`] / [`LayoutError::InvalidWeight`] for invalid
/// header or record values, and [`LayoutError::Io`] when the file cannot be
/// read.
pub fn read_edge_file(path: &Path) -> Result<GraphModel, LayoutError> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();

    if size < HEADER_BYTES {
        return Err(LayoutError::MalformedFile {
            size,
            reason: "file too short for the 4-byte node count header".into(),
        });
    }
    let remainder = (size - HEADER_BYTES) % RECORD_BYTES;
    if remainder != 0 {
        return Err(LayoutError::MalformedFile {
            size,
            reason: format!(
                "{remainder} stray bytes after the last complete 12-byte edge record"
            ),
        });
    }
    let record_count = ((size - HEADER_BYTES) / RECORD_BYTES) as usize;

    let mut reader = BufReader::new(file);
    let mut word = [0u8; 4];

    reader.read_exact(&mut word)?;
    let node_count = i32::from_le_bytes(word);
    if node_count < 0 {
        return Err(LayoutError::InvalidNodeCount {
            value: node_count as i64,
        });
    }
    let node_count = node_count as usize;

    let mut edges = Vec::with_capacity(record_count);
    for index in 0..record_count {
        reader.read_exact(&mut word)?;
        let u = i32::from_le_bytes(word);
        reader.read_exact(&mut word)?;
        let v = i32::from_le_bytes(word);
        reader.read_exact(&mut word)?;
        let weight = f32::from_le_bytes(word);

        // Negative endpoints cannot be represented as indices; report them
        // here so the caller sees the raw record value.
        if u < 0 || v < 0 {
            return Err(LayoutError::InvalidEdge {
                index,
                endpoint: u.min(v) as i64,
                node_count,
            });
        }
        edges.push(Edge::new(u as usize, v as usize, weight));
    }

    debug!(
        "edge file ingested: {} bytes, {} nodes, {} records",
        size, node_count, record_count
    );
    GraphModel::from_edges(node_count, edges)
}
