use std::path::Path;

use tracing::info;

use crate::core::records::{AssemblyRecords, PathRecord};
use crate::core::types::{Assembler, Orientation, OrientedSegment};
use crate::parsing::gfa::{parse_gfa_file, GfaGraph};
use crate::parsing::paths::{parse_paths_file, ContigPaths};
use crate::parsing::{contig_number, ParseError};

/// Read the assembler output into the records the graph builder consumes
///
/// SPAdes needs both the GFA graph and `contigs.paths`; MEGAHIT contigs are
/// the GFA segments themselves, so `paths` must be `None`.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if the path file is missing for SPAdes
/// or given for MEGAHIT, or any error from the underlying parsers.
pub fn load_records(
    assembler: Assembler,
    graph: &Path,
    paths: Option<&Path>,
) -> Result<AssemblyRecords, ParseError> {
    let records = match (assembler, paths) {
        (Assembler::Spades, Some(paths)) => {
            spades_records(parse_gfa_file(graph)?, parse_paths_file(paths)?)
        }
        (Assembler::Spades, None) => {
            return Err(ParseError::InvalidFormat(
                "SPAdes input needs a contigs.paths file".to_string(),
            ))
        }
        (Assembler::Megahit, None) => megahit_records(parse_gfa_file(graph)?)?,
        (Assembler::Megahit, Some(_)) => {
            return Err(ParseError::InvalidFormat(
                "MEGAHIT input takes no contigs.paths file".to_string(),
            ))
        }
    };

    info!(
        "Loaded {} assembly: {} contigs, {} paths, {} links",
        assembler,
        records.contigs.len(),
        records.paths.len(),
        records.links.len()
    );

    Ok(records)
}

/// Combine SPAdes graph links with the contig paths
#[must_use]
pub fn spades_records(gfa: GfaGraph, paths: ContigPaths) -> AssemblyRecords {
    AssemblyRecords {
        contigs: paths.contigs,
        paths: paths.paths,
        links: gfa.links,
    }
}

/// Treat each MEGAHIT segment as a one-segment contig, in both orientations
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a segment name carries no contig number.
pub fn megahit_records(gfa: GfaGraph) -> Result<AssemblyRecords, ParseError> {
    let mut records = AssemblyRecords {
        links: gfa.links,
        ..AssemblyRecords::default()
    };

    for name in gfa.segments {
        let contig = contig_number(&name).ok_or_else(|| {
            ParseError::InvalidFormat(format!(
                "MEGAHIT segment '{name}' is not a NODE_<n> contig name"
            ))
        })?;
        records.contigs.insert(contig);

        let forward = OrientedSegment::new(name, Orientation::Forward);
        let reverse = forward.flipped();
        records.paths.push(PathRecord::new(contig, vec![forward]));
        records.paths.push(PathRecord::new(contig, vec![reverse]));
    }

    Ok(records)
}
