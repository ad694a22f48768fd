//! Parser for SPAdes `contigs.paths` files.
//!
//! The file alternates contig name lines and path lines:
//!
//! ```text
//! NODE_1_length_1000_cov_5.0
//! 12+,7-,3+
//! NODE_1_length_1000_cov_5.0'
//! 3-,7+,12-
//! NODE_2_length_400_cov_2.0
//! 8+;
//! 9-
//! ```
//!
//! A path line ending in `;` marks a scaffold gap and continues on the next
//! line; the pieces are joined into one path.

use std::path::Path;

use tracing::debug;

use crate::core::contig_map::ContigIdMap;
use crate::core::records::PathRecord;
use crate::core::types::OrientedSegment;
use crate::parsing::{contig_number, read_text, ParseError};
use crate::utils::validation::check_record_limit;

/// Contig table and path records read from a paths file
#[derive(Debug, Clone, Default)]
pub struct ContigPaths {
    /// Contigs in order of first appearance
    pub contigs: ContigIdMap,
    /// Every path record, forward and reverse-complement alike
    pub paths: Vec<PathRecord>,
}

/// Parse a `contigs.paths` file (optionally gzipped)
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_paths_file(path: &Path) -> Result<ContigPaths, ParseError> {
    let text = read_text(path)?;
    parse_paths_text(&text)
}

/// Parse `contigs.paths` text
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for a name line without a contig number,
/// a name without a path, or a malformed segment token, and
/// `ParseError::TooManyRecords` if the limit is exceeded.
pub fn parse_paths_text(text: &str) -> Result<ContigPaths, ParseError> {
    let mut result = ContigPaths::default();
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    while let Some((line_num, name)) = lines.next() {
        let contig = contig_number(name).ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "Expected a NODE_<n> contig name on line {line_num}, found '{name}'"
            ))
        })?;

        let mut path = String::new();
        loop {
            let (_, piece) = lines.next().ok_or_else(|| {
                ParseError::InvalidFormat(format!("Contig '{name}' has no path"))
            })?;
            match piece.strip_suffix(';') {
                Some(head) => {
                    path.push_str(head);
                    path.push(',');
                }
                None => {
                    path.push_str(piece);
                    break;
                }
            }
        }

        let segments = parse_segments(&path, name)?;

        if check_record_limit(result.paths.len()).is_some() {
            return Err(ParseError::TooManyRecords(result.paths.len()));
        }

        result.contigs.insert(contig);
        result.paths.push(PathRecord::new(contig, segments));
    }

    debug!(
        "Read {} paths for {} contigs",
        result.paths.len(),
        result.contigs.len()
    );

    Ok(result)
}

fn parse_segments(path: &str, name: &str) -> Result<Vec<OrientedSegment>, ParseError> {
    path.split(',')
        .filter(|token| !token.trim().is_empty())
        .map(|token| {
            token.parse::<OrientedSegment>().map_err(|e| {
                ParseError::InvalidFormat(format!("In path of contig '{name}': {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .and_then(|segments| {
            if segments.is_empty() {
                Err(ParseError::InvalidFormat(format!(
                    "Contig '{name}' has an empty path"
                )))
            } else {
                Ok(segments)
            }
        })
}
