//! Result files and run reporting.
//!
//! - [`writer`]: the refined binning CSV and the list of contigs excluded from
//!   propagation, written atomically
//! - [`summary`]: the [`RunSummary`](summary::RunSummary) printed at the end of
//!   a run as text, JSON or TSV

use thiserror::Error;

use crate::core::types::ContigId;

pub mod summary;
pub mod writer;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Contig {0} has no assembler name")]
    MissingContig(ContigId),
}
