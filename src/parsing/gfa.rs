//! Parser for GFA 1 assembly graphs.
//!
//! Only segment and link records are read:
//! - `S\t<name>\t<sequence>...`
//! - `L\t<from>\t<+|->\t<to>\t<+|->\t<overlap>...`
//!
//! Headers, paths, comments and unknown record types are skipped.

use std::path::Path;

use tracing::debug;

use crate::core::records::LinkRecord;
use crate::core::types::{Orientation, OrientedSegment};
use crate::parsing::{read_text, ParseError};
use crate::utils::validation::check_record_limit;

/// Segment names and links read from a GFA file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GfaGraph {
    /// Segment names in file order
    pub segments: Vec<String>,
    pub links: Vec<LinkRecord>,
}

/// Parse a GFA file (optionally gzipped)
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_gfa_file(path: &Path) -> Result<GfaGraph, ParseError> {
    let text = read_text(path)?;
    parse_gfa_text(&text)
}

/// Parse GFA text
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if an `S` or `L` line has too few
/// fields or an invalid orientation, or `ParseError::TooManyRecords` if the
/// limit is exceeded.
pub fn parse_gfa_text(text: &str) -> Result<GfaGraph, ParseError> {
    let mut graph = GfaGraph::default();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;
        let fields: Vec<&str> = line.split('\t').collect();

        match fields[0] {
            "S" => {
                if fields.len() < 2 || fields[1].is_empty() {
                    return Err(ParseError::InvalidFormat(format!(
                        "GFA segment on line {line_num} has no name"
                    )));
                }
                if check_record_limit(graph.segments.len()).is_some() {
                    return Err(ParseError::TooManyRecords(graph.segments.len()));
                }
                graph.segments.push(fields[1].to_string());
            }
            "L" => {
                if fields.len() < 5 {
                    return Err(ParseError::InvalidFormat(format!(
                        "GFA link on line {line_num} has {} fields, expected at least 5",
                        fields.len()
                    )));
                }
                if check_record_limit(graph.links.len()).is_some() {
                    return Err(ParseError::TooManyRecords(graph.links.len()));
                }
                let from = oriented(fields[1], fields[2], line_num)?;
                let to = oriented(fields[3], fields[4], line_num)?;
                graph.links.push(LinkRecord::new(from, to));
            }
            _ => {}
        }
    }

    debug!(
        "Read {} segments and {} links from GFA",
        graph.segments.len(),
        graph.links.len()
    );

    Ok(graph)
}

fn oriented(name: &str, sign: &str, line_num: usize) -> Result<OrientedSegment, ParseError> {
    let mut chars = sign.chars();
    let orientation = match (chars.next(), chars.next()) {
        (Some(c), None) => Orientation::from_sign(c),
        _ => None,
    }
    .ok_or_else(|| {
        ParseError::InvalidFormat(format!(
            "Invalid orientation '{sign}' on line {line_num}: expected '+' or '-'"
        ))
    })?;

    if name.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "Empty segment name in link on line {line_num}"
        )));
    }

    Ok(OrientedSegment::new(name, orientation))
}
