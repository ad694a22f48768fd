//! Assembly graph construction.
//!
//! - [`SegmentIndex`](index::SegmentIndex): reverse lookups from oriented
//!   segments to linked segments and to the contigs whose paths contain them
//! - [`GraphBuilder`](builder::GraphBuilder): turns path and link records into
//!   an [`AdjacencyGraph`](crate::core::graph::AdjacencyGraph)
//!
//! ## Edge rule
//!
//! For each contig, the first and last segments of its path and their
//! opposite-strand complements are looked up in the link index. Every contig
//! whose path contains a linked segment becomes a neighbour. Parallel edges
//! and self-loops are removed once all contigs are processed.

use thiserror::Error;

pub mod builder;
pub mod index;

pub use builder::{build_graph, GraphBuilder};

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Path refers to contig NODE_{0}, which is not in the contig table")]
    UnknownContig(u64),

    #[error("Path for contig NODE_{0} has no segments")]
    EmptyPath(u64),
}
