//! Compute layer: spatial indexing and coordinate validation.
//!
//! This module is independent of where records come from. It provides:
//! - A static 2-d tree and nearest-neighbor search over lightweight keys
//! - Geographic range validation for query and record coordinates

pub mod kdtree;
pub mod validation;

pub use kdtree::{Axis, IndexKey, KdTree, Neighbor, SpatialIndex};
