use serde::{Deserialize, Serialize};

use crate::core::contig_map::ContigIdMap;
use crate::core::types::OrientedSegment;

/// A contig's traversal of the underlying sequence graph.
///
/// A contig may carry more than one record (SPAdes lists the reverse
/// complement as a separate `'` entry). Every record feeds the
/// segment -> contig index; only the first record of a contig supplies the
/// endpoints used to discover edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRecord {
    /// Assembler contig number
    pub contig: u64,
    /// Ordered, oriented segments; never empty
    pub segments: Vec<OrientedSegment>,
}

impl PathRecord {
    pub fn new(contig: u64, segments: Vec<OrientedSegment>) -> Self {
        Self { contig, segments }
    }

    #[must_use]
    pub fn first(&self) -> Option<&OrientedSegment> {
        self.segments.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&OrientedSegment> {
        self.segments.last()
    }
}

/// An unordered physical adjacency between two oriented segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub from: OrientedSegment,
    pub to: OrientedSegment,
}

impl LinkRecord {
    pub fn new(from: OrientedSegment, to: OrientedSegment) -> Self {
        Self { from, to }
    }

    /// The same link with its two ends swapped
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }
}

/// Everything the graph builder needs, as produced by the assembler parsers
#[derive(Debug, Clone, Default)]
pub struct AssemblyRecords {
    pub contigs: ContigIdMap,
    pub paths: Vec<PathRecord>,
    pub links: Vec<LinkRecord>,
}

impl AssemblyRecords {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.contigs.len()
    }
}
