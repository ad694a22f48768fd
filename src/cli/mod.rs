//! Command-line interface for graphbin.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **refine**: Refine an initial binning using the assembly graph
//! - **graph**: Build the contig adjacency graph and report its shape
//!
//! ## Usage
//!
//! ```text
//! # Refine a metaSPAdes binning
//! graphbin refine --assembler spades \
//!     --graph assembly_graph_with_scaffolds.gfa \
//!     --paths contigs.paths \
//!     --binned initial_bins.csv \
//!     --output results/
//!
//! # MEGAHIT graphs carry no paths file
//! graphbin refine --assembler megahit --graph final.gfa \
//!     --binned initial_bins.csv --output results/ --prefix sample1
//!
//! # JSON summary for scripting
//! graphbin --format json refine ...
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::types::Assembler;

pub mod graph;
pub mod refine;

#[derive(Parser)]
#[command(name = "graphbin")]
#[command(version)]
#[command(about = "Refine metagenomic contig binning using the assembly graph")]
#[command(
    long_about = "graphbin improves an existing binning of assembled contigs.\n\nIt builds a graph of contigs that are adjacent in the assembly graph and:\n- Removes bin labels that contradict the contig's neighbourhood\n- Propagates the remaining labels to unbinned contigs connected to them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refine an initial binning using the assembly graph
    Refine(refine::RefineArgs),

    /// Build the contig graph only and report node and edge counts
    Graph(graph::GraphArgs),
}

/// Assembler inputs shared by every command
#[derive(clap::Args)]
pub struct AssemblyArgs {
    /// Assembler that produced the graph
    #[arg(long, value_enum)]
    pub assembler: Assembler,

    /// Assembly graph in GFA format (may be gzipped)
    #[arg(long)]
    pub graph: PathBuf,

    /// SPAdes contigs.paths file (required for SPAdes, not used by MEGAHIT)
    #[arg(long)]
    pub paths: Option<PathBuf>,
}

impl AssemblyArgs {
    /// Check the paths file is given exactly when the assembler needs it
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending option.
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.assembler, &self.paths) {
            (Assembler::Spades, None) => {
                anyhow::bail!("--paths is required when --assembler is spades")
            }
            (Assembler::Megahit, Some(_)) => {
                anyhow::bail!("--paths is not used when --assembler is megahit")
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
