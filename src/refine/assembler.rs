use tracing::{debug, info};

use crate::core::bins::BinAssignment;
use crate::core::graph::AdjacencyGraph;
use crate::core::types::{BinId, ContigId};
use crate::refine::propagation::{PropagationError, PropagationOutput};
use crate::refine::resolver::AmbiguityResolver;

/// Folds propagation results back into the assignment and runs the final
/// direct-neighbour cleanup.
pub struct ResultAssembler<'a> {
    graph: &'a AdjacencyGraph,
}

impl<'a> ResultAssembler<'a> {
    #[must_use]
    pub fn new(graph: &'a AdjacencyGraph) -> Self {
        Self { graph }
    }

    /// Insert every propagated label whose contig is not yet in any bin.
    ///
    /// Contigs that already hold a bin keep it. Applying the same output a
    /// second time changes nothing. Returns the newly labelled contigs.
    ///
    /// # Errors
    ///
    /// Returns `PropagationError::InvalidResult` for a label outside
    /// `1..=n_bins` and `PropagationError::UnknownContig` for a contig outside
    /// the graph. Nothing is inserted when an error is returned.
    pub fn merge(
        &self,
        bins: &mut BinAssignment,
        output: &PropagationOutput,
    ) -> Result<Vec<ContigId>, PropagationError> {
        let n_bins = bins.n_bins();
        for &(contig, label) in &output.labels {
            if label == 0 || label > n_bins {
                return Err(PropagationError::InvalidResult {
                    contig,
                    label,
                    n_bins,
                });
            }
            if contig.index() >= bins.node_count() {
                return Err(PropagationError::UnknownContig(contig));
            }
        }

        let mut added = Vec::new();
        for &(contig, label) in &output.labels {
            // Both ranges were checked above
            if let Ok(true) = bins.insert(contig, BinId(label - 1)) {
                added.push(contig);
            }
        }

        debug!("Merged {} propagated labels", added.len());
        Ok(added)
    }

    /// Merge, then strip labels that disagree with already-settled neighbours
    ///
    /// # Errors
    ///
    /// Propagates errors from [`ResultAssembler::merge`].
    pub fn assemble(
        &self,
        bins: &mut BinAssignment,
        output: &PropagationOutput,
    ) -> Result<AssemblyOutcome, PropagationError> {
        let added = self.merge(bins, output)?;
        let removed = AmbiguityResolver::new(self.graph).cleanup(bins);

        info!(
            "Propagation labelled {} contigs; final cleanup removed {}",
            added.len(),
            removed.len()
        );

        Ok(AssemblyOutcome { added, removed })
    }
}

/// Contigs touched while assembling the final result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyOutcome {
    pub added: Vec<ContigId>,
    pub removed: Vec<ContigId>,
}
