//! # graphbin
//!
//! A library for refining metagenomic contig binning with the assembly graph.
//!
//! Binning tools group assembled contigs into bins (putative genomes) from
//! composition and coverage, and typically leave many contigs unbinned or
//! mis-binned. Contigs that are adjacent in the assembly graph usually come
//! from the same genome, so `graphbin` uses that adjacency to correct an
//! existing binning.
//!
//! ## Features
//!
//! - **SPAdes and MEGAHIT input**: GFA graphs plus `contigs.paths` for SPAdes
//! - **Ambiguity removal**: Drops labels that contradict a contig's neighbours
//! - **Label propagation**: Extends bins to unbinned contigs connected to them
//! - **Never overwrites**: Surviving initial labels are always kept
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use graphbin::parsing::assembly::load_records;
//! use graphbin::parsing::bins::{build_assignment, parse_bins_file};
//! use graphbin::{build_graph, Assembler, LabelPropagation, PropagationParams, RefinePipeline};
//!
//! let records = load_records(
//!     Assembler::Spades,
//!     Path::new("assembly_graph_with_scaffolds.gfa"),
//!     Some(Path::new("contigs.paths")),
//! )
//! .unwrap();
//! let graph = build_graph(&records).unwrap();
//!
//! let entries = parse_bins_file(Path::new("initial_bins.csv")).unwrap();
//! let bins = build_assignment(&entries, &records.contigs).unwrap();
//!
//! let oracle = LabelPropagation::new();
//! let outcome = RefinePipeline::new(&graph, &oracle, PropagationParams::default())
//!     .run(bins)
//!     .unwrap();
//!
//! println!("{} contigs binned", outcome.stats.finally_binned);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Contig ids, path records, the adjacency graph and bin membership
//! - [`graph`]: Builds the contig adjacency graph from assembler records
//! - [`parsing`]: Parsers for GFA, SPAdes paths and binning CSV files
//! - [`refine`]: Ambiguity removal, component analysis and label propagation
//! - [`output`]: Result files and run summaries
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod graph;
pub mod output;
pub mod parsing;
pub mod refine;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::bins::{BinAssignment, BinSnapshot};
pub use core::graph::AdjacencyGraph;
pub use core::records::AssemblyRecords;
pub use core::types::*;
pub use graph::build_graph;
pub use refine::{
    LabelPropagation, PropagationOracle, PropagationParams, RefineConfig, RefineOutcome,
    RefinePipeline, RefineStats,
};
