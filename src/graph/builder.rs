use tracing::{debug, info};

use crate::core::graph::AdjacencyGraph;
use crate::core::records::{AssemblyRecords, PathRecord};
use crate::core::types::{ContigId, OrientedSegment};
use crate::graph::index::SegmentIndex;
use crate::graph::GraphError;

/// Builds the contig adjacency graph from path and link records.
///
/// Two contigs are adjacent when an endpoint of one contig's path (first or
/// last segment, on either strand) is linked to a segment lying on the other
/// contig's path.
pub struct GraphBuilder<'a> {
    records: &'a AssemblyRecords,
}

impl<'a> GraphBuilder<'a> {
    #[must_use]
    pub fn new(records: &'a AssemblyRecords) -> Self {
        Self { records }
    }

    /// Build the graph with exactly `records.node_count()` vertices.
    ///
    /// Contigs whose endpoints match no link end up isolated.
    ///
    /// # Errors
    ///
    /// Returns `GraphError` if a path names an unknown contig or is empty.
    pub fn build(&self) -> Result<AdjacencyGraph, GraphError> {
        let node_count = self.records.node_count();
        let index = SegmentIndex::build(self.records)?;

        debug!(
            "Indexed {} links over {} path segments",
            index.link_count(),
            index.segment_count()
        );

        let mut edges = Vec::new();
        for (contig, path) in self.primary_paths()?.into_iter().enumerate() {
            let Some(path) = path else {
                continue;
            };
            let source = ContigId(contig);
            let endpoints = endpoint_segments(path);

            for target in index.linked_contigs(&endpoints) {
                if target != source {
                    edges.push((source, target));
                }
            }
        }

        let graph = AdjacencyGraph::from_edges(node_count, &edges);

        info!(
            "Built assembly graph with {} contigs and {} edges ({} isolated)",
            graph.node_count(),
            graph.edge_count(),
            graph.isolated_count()
        );

        Ok(graph)
    }

    /// The first path record of every contig, indexed by internal id
    fn primary_paths(&self) -> Result<Vec<Option<&'a PathRecord>>, GraphError> {
        let mut primary = vec![None; self.records.node_count()];
        for path in &self.records.paths {
            let id = self
                .records
                .contigs
                .internal(path.contig)
                .ok_or(GraphError::UnknownContig(path.contig))?;
            let slot = &mut primary[id.index()];
            if slot.is_none() {
                *slot = Some(path);
            }
        }
        Ok(primary)
    }
}

/// First and last segments of a path plus their opposite-strand complements
fn endpoint_segments(path: &PathRecord) -> Vec<OrientedSegment> {
    let mut endpoints = Vec::with_capacity(4);
    for segment in [path.first(), path.last()].into_iter().flatten() {
        endpoints.push(segment.clone());
        endpoints.push(segment.flipped());
    }
    endpoints
}

/// Build the adjacency graph for a set of assembler records
///
/// # Errors
///
/// Returns `GraphError` if the records are inconsistent.
pub fn build_graph(records: &AssemblyRecords) -> Result<AdjacencyGraph, GraphError> {
    GraphBuilder::new(records).build()
}
