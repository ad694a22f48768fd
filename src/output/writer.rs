use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::core::bins::BinAssignment;
use crate::core::contig_map::ContigIdMap;
use crate::core::types::ContigId;
use crate::output::OutputError;
use crate::parsing::contig_name;

/// Bin column value for contigs left outside every bin
pub const UNBINNED: &str = "unbinned";

/// Locations of the result files for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub bins: PathBuf,
    pub isolated: PathBuf,
}

impl OutputPaths {
    /// `prefix` must already be normalised (empty or ending in `_`)
    #[must_use]
    pub fn new(dir: &Path, prefix: &str) -> Self {
        Self {
            bins: dir.join(format!("{prefix}graphbin_output.csv")),
            isolated: dir.join(format!("{prefix}graphbin_isolated.csv")),
        }
    }
}

/// One `NODE_<n>,<bin label>` row per contig in internal id order
///
/// # Errors
///
/// Returns `OutputError::MissingContig` if a contig in `bins` has no entry in
/// `contigs`.
pub fn format_bins_csv(bins: &BinAssignment, contigs: &ContigIdMap) -> Result<String, OutputError> {
    let mut out = String::new();
    for index in 0..bins.node_count() {
        let contig = ContigId(index);
        let external = contigs
            .external(contig)
            .ok_or(OutputError::MissingContig(contig))?;
        let label = bins
            .bin_of(contig)
            .and_then(|bin| bins.label(bin))
            .map_or_else(|| UNBINNED.to_string(), |l| l.to_string());
        let _ = writeln!(out, "{},{}", contig_name(external), label);
    }
    Ok(out)
}

/// One `NODE_<n>` row per contig
///
/// # Errors
///
/// Returns `OutputError::MissingContig` if a contig has no entry in `contigs`.
pub fn format_isolated_csv(
    isolated: impl IntoIterator<Item = ContigId>,
    contigs: &ContigIdMap,
) -> Result<String, OutputError> {
    let mut out = String::new();
    for contig in isolated {
        let external = contigs
            .external(contig)
            .ok_or(OutputError::MissingContig(contig))?;
        let _ = writeln!(out, "{}", contig_name(external));
    }
    Ok(out)
}

/// Write each file atomically.
///
/// Each file is first written in full to a temporary file next to its
/// destination, and renames start only once every temporary was written. A
/// single file is never left half-written, but a failed rename can leave
/// earlier files of the batch already in place.
///
/// # Errors
///
/// Returns `OutputError::Io` if a temporary file cannot be created or written,
/// or `OutputError::Persist` if renaming fails.
pub fn write_atomically(files: &[(&Path, &str)]) -> Result<(), OutputError> {
    let mut staged = Vec::with_capacity(files.len());
    for &(path, contents) in files {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(contents.as_bytes())?;
        temp.flush()?;
        staged.push((temp, path));
    }

    for (temp, path) in staged {
        temp.persist(path)?;
        debug!("Wrote {}", path.display());
    }
    Ok(())
}

/// Write the refined binning and, when non-empty, the isolated contig list.
///
/// An isolated list left by an earlier run is removed when this run has none.
///
/// # Errors
///
/// Returns `OutputError` if formatting, writing or removing a stale file
/// fails. No file is left half-written on failure.
pub fn write_results(
    paths: &OutputPaths,
    bins: &BinAssignment,
    isolated: &[ContigId],
    contigs: &ContigIdMap,
) -> Result<(), OutputError> {
    let bins_csv = format_bins_csv(bins, contigs)?;
    if isolated.is_empty() {
        write_atomically(&[(paths.bins.as_path(), bins_csv.as_str())])?;
        remove_stale(&paths.isolated)?;
    } else {
        let isolated_csv = format_isolated_csv(isolated.iter().copied(), contigs)?;
        write_atomically(&[
            (paths.bins.as_path(), bins_csv.as_str()),
            (paths.isolated.as_path(), isolated_csv.as_str()),
        ])?;
    }

    info!("Binning result written to {}", paths.bins.display());
    if !isolated.is_empty() {
        info!(
            "{} contigs excluded from propagation listed in {}",
            isolated.len(),
            paths.isolated.display()
        );
    }
    Ok(())
}

fn remove_stale(path: &Path) -> Result<(), OutputError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
