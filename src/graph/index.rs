use std::collections::{BTreeSet, HashMap, HashSet};

use crate::core::records::AssemblyRecords;
use crate::core::types::{ContigId, OrientedSegment};
use crate::graph::GraphError;

/// Reverse lookups over the assembler records.
///
/// Both maps are keyed by oriented segment so edge discovery for a contig
/// costs only its incident link and owner fan-out.
#[derive(Debug, Default)]
pub struct SegmentIndex {
    /// Index: segment -> segments it is linked to (symmetric)
    links: HashMap<OrientedSegment, HashSet<OrientedSegment>>,

    /// Index: segment -> contigs whose path contains it
    owners: HashMap<OrientedSegment, BTreeSet<ContigId>>,
}

impl SegmentIndex {
    /// Index every link in both directions and every segment of every path
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnknownContig` if a path names a contig missing
    /// from the id table, or `GraphError::EmptyPath` for a path with no segments.
    pub fn build(records: &AssemblyRecords) -> Result<Self, GraphError> {
        let mut index = Self::default();

        for link in &records.links {
            index
                .links
                .entry(link.from.clone())
                .or_default()
                .insert(link.to.clone());
            index
                .links
                .entry(link.to.clone())
                .or_default()
                .insert(link.from.clone());
        }

        for path in &records.paths {
            if path.segments.is_empty() {
                return Err(GraphError::EmptyPath(path.contig));
            }
            let contig = records
                .contigs
                .internal(path.contig)
                .ok_or(GraphError::UnknownContig(path.contig))?;

            for segment in &path.segments {
                index
                    .owners
                    .entry(segment.clone())
                    .or_default()
                    .insert(contig);
            }
        }

        Ok(index)
    }

    /// Segments linked to `segment`
    pub fn linked<'a>(
        &'a self,
        segment: &OrientedSegment,
    ) -> impl Iterator<Item = &'a OrientedSegment> + 'a {
        self.links.get(segment).into_iter().flatten()
    }

    /// Contigs whose path contains `segment`
    pub fn owners<'a>(&'a self, segment: &OrientedSegment) -> impl Iterator<Item = ContigId> + 'a {
        self.owners.get(segment).into_iter().flatten().copied()
    }

    /// Contigs reachable through one link from any of `endpoints`
    #[must_use]
    pub fn linked_contigs(&self, endpoints: &[OrientedSegment]) -> BTreeSet<ContigId> {
        let mut found = BTreeSet::new();
        for endpoint in endpoints {
            for other in self.linked(endpoint) {
                found.extend(self.owners(other));
            }
        }
        found
    }

    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.values().map(HashSet::len).sum::<usize>() / 2
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.owners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::{LinkRecord, PathRecord};

    fn seg(s: &str) -> OrientedSegment {
        s.parse().unwrap()
    }

    fn records() -> AssemblyRecords {
        let mut records = AssemblyRecords::default();
        records.contigs.insert(1);
        records.contigs.insert(2);
        records.paths = vec![
            PathRecord::new(1, vec![seg("10+"), seg("11+")]),
            PathRecord::new(2, vec![seg("20+")]),
            PathRecord::new(2, vec![seg("11+")]),
        ];
        records.links = vec![LinkRecord::new(seg("11+"), seg("20+"))];
        records
    }

    #[test]
    fn test_links_are_symmetric() {
        let index = SegmentIndex::build(&records()).unwrap();
        assert_eq!(index.linked(&seg("11+")).collect::<Vec<_>>(), vec![&seg("20+")]);
        assert_eq!(index.linked(&seg("20+")).collect::<Vec<_>>(), vec![&seg("11+")]);
        assert_eq!(index.linked(&seg("10+")).count(), 0);
        assert_eq!(index.link_count(), 1);
    }

    #[test]
    fn test_segment_shared_by_several_contigs() {
        let index = SegmentIndex::build(&records()).unwrap();
        let owners: Vec<_> = index.owners(&seg("11+")).collect();
        assert_eq!(owners, vec![ContigId(0), ContigId(1)]);
    }

    #[test]
    fn test_linked_contigs() {
        let index = SegmentIndex::build(&records()).unwrap();
        let found = index.linked_contigs(&[seg("20+")]);
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![ContigId(0), ContigId(1)]);
    }

    #[test]
    fn test_unknown_contig_in_path() {
        let mut records = records();
        records.paths.push(PathRecord::new(99, vec![seg("1+")]));
        assert!(matches!(
            SegmentIndex::build(&records),
            Err(GraphError::UnknownContig(99))
        ));
    }

    #[test]
    fn test_empty_path() {
        let mut records = records();
        records.paths.push(PathRecord::new(1, Vec::new()));
        assert!(matches!(
            SegmentIndex::build(&records),
            Err(GraphError::EmptyPath(1))
        ));
    }
}
