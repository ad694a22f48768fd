//! Parsers for assembler output and initial binning results.
//!
//! This module provides parsers for:
//!
//! - **GFA assembly graphs**: `S` (segment) and `L` (link) lines
//! - **SPAdes `contigs.paths`**: contig -> oriented segment paths
//! - **Initial binning CSV**: `contig,bin` rows from an existing binning tool
//!
//! [`assembly::load_records`] combines them into the
//! [`AssemblyRecords`](crate::core::records::AssemblyRecords) the graph
//! builder consumes, according to the assembler that produced the files.
//!
//! ## Contig names
//!
//! Contigs are identified by the number in their `NODE_<n>` name:
//!
//! | Source | Example | Number |
//! |--------|---------|--------|
//! | SPAdes paths | `NODE_5_length_1234_cov_5.6` | 5 |
//! | SPAdes paths (reverse) | `NODE_5_length_1234_cov_5.6'` | 5 |
//! | MEGAHIT GFA segment | `NODE_5_length_870_cov_3.2` | 5 |
//! | Binning CSV | `NODE_5` or `5` | 5 |
//!
//! Files ending in `.gz` are decompressed transparently.

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;

pub mod assembly;
pub mod bins;
pub mod gfa;
pub mod paths;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Contig '{0}' in the binning result is not in the assembly graph")]
    UnknownContig(String),

    #[error("Contig '{contig}' is assigned to both bin {first} and bin {second}")]
    ConflictingBins {
        contig: String,
        first: u32,
        second: u32,
    },

    #[error("Too many records: {0} exceeds maximum allowed (10000000)")]
    TooManyRecords(usize),
}

/// Read a whole text file, decompressing it first if it ends in `.gz`
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or decompressed.
pub fn read_text(path: &Path) -> Result<String, ParseError> {
    if is_gzipped(path) {
        let file = std::fs::File::open(path)?;
        let mut text = String::new();
        GzDecoder::new(file).read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".gz")
}

/// Extract the contig number from `NODE_<n>...`, `NODE_<n>'` or a bare `<n>`
#[must_use]
pub fn contig_number(name: &str) -> Option<u64> {
    let name = name.trim().trim_end_matches('\'');
    let rest = name.strip_prefix("NODE_").unwrap_or(name);
    rest.split('_').next()?.parse().ok()
}

/// Display name for a contig number
#[must_use]
pub fn contig_name(number: u64) -> String {
    format!("NODE_{number}")
}
