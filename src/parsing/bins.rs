use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use tracing::{debug, warn};

use crate::core::bins::BinAssignment;
use crate::core::contig_map::ContigIdMap;
use crate::core::types::BinId;
use crate::parsing::{contig_name, contig_number, read_text, ParseError};
use crate::utils::validation::check_record_limit;

/// One `contig,bin` row of an initial binning result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinEntry {
    /// Assembler contig number
    pub contig: u64,
    /// Contig field as written in the file
    pub name: String,
    /// Bin number, always positive
    pub bin: u32,
}

/// Parse an initial binning CSV file (optionally gzipped)
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_bins_file(path: &Path) -> Result<Vec<BinEntry>, ParseError> {
    let text = read_text(path)?;
    parse_bins_text(&text)
}

/// Parse initial binning CSV text with columns: contig, bin
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line has fewer than 2 fields, an
/// unrecognised contig name, or a bin that is not a positive integer, or
/// `ParseError::TooManyRecords` if the limit is exceeded.
pub fn parse_bins_text(text: &str) -> Result<Vec<BinEntry>, ParseError> {
    let mut entries = Vec::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        // Check if first non-empty/non-comment line is a header
        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if first == "contig" || first == "contig_id" || first == "name" || first == "node" {
                continue;
            }
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        if fields.len() < 2 {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than 2 fields"
            )));
        }

        let name = fields[0];
        let contig = contig_number(name).ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "Invalid contig name on line {line_num}: '{name}'"
            ))
        })?;

        let bin: u32 = fields[1]
            .parse()
            .ok()
            .filter(|&b| b > 0)
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Invalid bin on line {line_num}: '{}', expected a positive integer",
                    fields[1]
                ))
            })?;

        if check_record_limit(entries.len()).is_some() {
            return Err(ParseError::TooManyRecords(entries.len()));
        }

        entries.push(BinEntry {
            contig,
            name: name.to_string(),
            bin,
        });
    }

    debug!("Read {} binning entries", entries.len());

    Ok(entries)
}

/// Build the initial [`BinAssignment`] from parsed rows.
///
/// Distinct bin numbers, sorted ascending, become bins `0..n_bins`.
///
/// # Errors
///
/// Returns `ParseError::UnknownContig` for a contig missing from `contigs`,
/// or `ParseError::ConflictingBins` for a contig listed in two bins.
pub fn build_assignment(
    entries: &[BinEntry],
    contigs: &ContigIdMap,
) -> Result<BinAssignment, ParseError> {
    let labels: Vec<u32> = entries
        .iter()
        .map(|e| e.bin)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let bin_ids: HashMap<u32, usize> = labels.iter().enumerate().map(|(i, &l)| (l, i)).collect();

    let mut assignment = BinAssignment::new(labels, contigs.len());
    let mut seen: HashMap<u64, u32> = HashMap::new();

    for entry in entries {
        let contig = contigs
            .internal(entry.contig)
            .ok_or_else(|| ParseError::UnknownContig(entry.name.clone()))?;

        if let Some(&first) = seen.get(&entry.contig) {
            if first != entry.bin {
                return Err(ParseError::ConflictingBins {
                    contig: contig_name(entry.contig),
                    first,
                    second: entry.bin,
                });
            }
            warn!(
                "{} is listed in bin {} more than once; ignoring the repeat",
                contig_name(entry.contig),
                entry.bin
            );
            continue;
        }
        seen.insert(entry.contig, entry.bin);

        let bin = BinId(bin_ids[&entry.bin]);
        assignment
            .insert(contig, bin)
            .map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
    }

    Ok(assignment)
}
