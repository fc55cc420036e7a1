//! Spatial partitioning for sub-quadratic repulsion.
//!
//! This module provides the Barnes–Hut quadtree the force models use to
//! approximate all-pairs repulsion in O(n log n) on large graphs.

mod quadtree;

pub use quadtree::QuadTree;
