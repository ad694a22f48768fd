//! Core data types for graph-based bin refinement.
//!
//! - [`ContigId`], [`BinId`]: dense internal ids for contigs and bins
//! - [`ContigIdMap`]: two-way table between internal ids and assembler contig numbers
//! - [`PathRecord`], [`LinkRecord`]: assembler records the graph is built from
//! - [`AdjacencyGraph`]: the immutable contig adjacency graph
//! - [`BinAssignment`], [`BinSnapshot`]: the mutable partition and its frozen view
//!
//! ## Lifecycle
//!
//! The id table and graph are built once and never change. The bin
//! assignment starts from the initial binning, loses labels during ambiguity
//! resolution, gains labels from propagation and is read out once at the end.
//!
//! [`ContigId`]: types::ContigId
//! [`BinId`]: types::BinId
//! [`ContigIdMap`]: contig_map::ContigIdMap
//! [`PathRecord`]: records::PathRecord
//! [`LinkRecord`]: records::LinkRecord
//! [`AdjacencyGraph`]: graph::AdjacencyGraph
//! [`BinAssignment`]: bins::BinAssignment
//! [`BinSnapshot`]: bins::BinSnapshot

pub mod bins;
pub mod contig_map;
pub mod graph;
pub mod records;
pub mod types;
