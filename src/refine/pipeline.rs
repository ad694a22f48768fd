use serde::Serialize;
use tracing::{info, warn};

use crate::core::bins::BinAssignment;
use crate::core::graph::AdjacencyGraph;
use crate::core::types::ContigId;
use crate::refine::assembler::ResultAssembler;
use crate::refine::components::{ComponentAnalyzer, Eligibility};
use crate::refine::propagation::{
    PropagationError, PropagationInput, PropagationOracle, PropagationParams,
};
use crate::refine::resolver::{AmbiguityResolver, ResolutionReport};

/// Counts gathered while refining, for reporting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefineStats {
    pub initially_binned: usize,
    pub neighbor_removed: usize,
    pub distance_removed: usize,
    pub eligible: usize,
    pub excluded: usize,
    pub propagated: usize,
    pub iterations: usize,
    pub converged: bool,
    pub cleanup_removed: usize,
    pub finally_binned: usize,
}

/// Everything the refinement produced
#[derive(Debug, Clone)]
pub struct RefineOutcome {
    pub bins: BinAssignment,
    pub eligibility: Eligibility,
    pub resolution: ResolutionReport,
    pub cleanup_removed: Vec<ContigId>,
    pub stats: RefineStats,
}

/// Run-wide settings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RefineConfig {
    pub params: PropagationParams,
    /// Worker threads for the parallel passes; 0 uses every core
    pub threads: usize,
}

impl RefineConfig {
    /// Size the global rayon pool.
    ///
    /// The pool can only be set up once per process, so later calls keep the
    /// first size.
    pub fn init_thread_pool(&self) {
        if self.threads > 0 {
            let built = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build_global();
            match built {
                Ok(()) => info!("Using {} worker threads", self.threads),
                Err(e) => warn!(
                    "Could not use {} worker threads, keeping the existing pool: {e}",
                    self.threads
                ),
            }
        }
    }
}

/// Runs resolution, component analysis, propagation and final assembly in order
pub struct RefinePipeline<'a, O: PropagationOracle> {
    graph: &'a AdjacencyGraph,
    oracle: &'a O,
    params: PropagationParams,
}

impl<'a, O: PropagationOracle> RefinePipeline<'a, O> {
    pub fn new(graph: &'a AdjacencyGraph, oracle: &'a O, params: PropagationParams) -> Self {
        Self {
            graph,
            oracle,
            params,
        }
    }

    /// Refine `bins` in place of the initial binning and return the result
    ///
    /// # Errors
    ///
    /// Returns `PropagationError` if the oracle rejects its input or returns
    /// labels that break the output contract.
    pub fn run(&self, mut bins: BinAssignment) -> Result<RefineOutcome, PropagationError> {
        let initially_binned = bins.assigned_count();
        info!(
            "Refining {} binned contigs across {} bins",
            initially_binned,
            bins.n_bins()
        );

        let resolution = AmbiguityResolver::new(self.graph).resolve(&mut bins);

        let eligibility = ComponentAnalyzer::new(self.graph).analyze(&bins);

        let input = PropagationInput::from_assignment(self.graph, &bins, &eligibility);
        let output = self.oracle.propagate(&input, &self.params)?;

        let assembled = ResultAssembler::new(self.graph).assemble(&mut bins, &output)?;

        let stats = RefineStats {
            initially_binned,
            neighbor_removed: resolution.neighbor_removed.len(),
            distance_removed: resolution.distance_removed.len(),
            eligible: eligibility.eligible_count(),
            excluded: self.graph.node_count() - eligibility.eligible_count(),
            propagated: assembled.added.len(),
            iterations: output.iterations,
            converged: output.converged,
            cleanup_removed: assembled.removed.len(),
            finally_binned: bins.assigned_count(),
        };

        info!(
            "Refinement finished: {} of {} contigs binned",
            stats.finally_binned,
            self.graph.node_count()
        );

        Ok(RefineOutcome {
            bins,
            eligibility,
            resolution,
            cleanup_removed: assembled.removed,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BinId;
    use crate::refine::propagation::{LabelPropagation, PropagationOutput};

    fn path6() -> AdjacencyGraph {
        let edges: Vec<_> = (1..6).map(|i| (ContigId(i - 1), ContigId(i))).collect();
        AdjacencyGraph::from_edges(6, &edges)
    }

    /// Oracle that labels every unassigned node with bin 1
    struct FirstBin;

    impl PropagationOracle for FirstBin {
        fn propagate(
            &self,
            input: &PropagationInput,
            _params: &PropagationParams,
        ) -> Result<PropagationOutput, PropagationError> {
            Ok(PropagationOutput {
                labels: input
                    .nodes
                    .iter()
                    .map(|n| (n.contig, n.label.max(1)))
                    .collect(),
                iterations: 0,
                converged: true,
            })
        }
    }

    #[test]
    fn test_pipeline_moves_conflicting_contig() {
        let g = path6();
        let mut bins = BinAssignment::with_bin_count(2, 6);
        for (c, b) in [(0, 0), (2, 0), (1, 1), (4, 1), (5, 1)] {
            bins.insert(ContigId(c), BinId(b)).unwrap();
        }

        let oracle = LabelPropagation::new();
        let outcome = RefinePipeline::new(&g, &oracle, PropagationParams::default())
            .run(bins)
            .unwrap();

        assert_eq!(outcome.bins.bin_of(ContigId(2)), Some(BinId(1)));
        assert_eq!(outcome.stats.neighbor_removed, 3);
        assert_eq!(outcome.stats.eligible, 6);
        assert_eq!(outcome.stats.finally_binned, 6);
    }

    #[test]
    fn test_pipeline_with_custom_oracle() {
        // 0(bin 2) - 1 - 2 ; 3 isolated and unlabelled
        let edges = [(ContigId(0), ContigId(1)), (ContigId(1), ContigId(2))];
        let g = AdjacencyGraph::from_edges(4, &edges);
        let mut bins = BinAssignment::with_bin_count(2, 4);
        bins.insert(ContigId(0), BinId(1)).unwrap();

        let outcome = RefinePipeline::new(&g, &FirstBin, PropagationParams::default())
            .run(bins)
            .unwrap();

        // 1 joins bin 1 and conflicts with 0, so both lose their label;
        // 2 agreed with 1 before the cleanup and keeps bin 1
        assert_eq!(outcome.cleanup_removed, vec![ContigId(0), ContigId(1)]);
        assert_eq!(outcome.bins.bin_of(ContigId(2)), Some(BinId(0)));
        assert!(!outcome.eligibility.is_eligible(ContigId(3)));
        assert_eq!(outcome.stats.excluded, 1);
    }

    #[test]
    fn test_default_config() {
        let config = RefineConfig::default();
        assert_eq!(config.threads, 0);
        assert_eq!(config.params, PropagationParams::default());
        // A zero-thread config leaves the global pool alone
        config.init_thread_pool();
    }

    #[test]
    fn test_thread_pool_set_up_twice() {
        let config = RefineConfig {
            threads: 2,
            ..RefineConfig::default()
        };
        // The global pool can only be built once; the second call must not panic
        config.init_thread_pool();
        config.init_thread_pool();
        assert!(rayon::current_num_threads() >= 1);
    }
}
