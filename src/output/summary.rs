use std::time::Duration;

use serde::Serialize;

use crate::core::types::Assembler;
use crate::refine::RefineStats;

/// What one `refine` run did, for the user or for scripts
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub assembler: Assembler,
    pub started_at: String,
    pub contigs: usize,
    pub edges: usize,
    pub bins: usize,
    #[serde(flatten)]
    pub stats: RefineStats,
    pub unbinned: usize,
    pub elapsed_seconds: f64,
    pub output: String,
}

impl RunSummary {
    #[must_use]
    pub fn new(
        assembler: Assembler,
        started_at: String,
        contigs: usize,
        edges: usize,
        bins: usize,
        stats: RefineStats,
    ) -> Self {
        let unbinned = contigs.saturating_sub(stats.finally_binned);
        Self {
            assembler,
            started_at,
            contigs,
            edges,
            bins,
            stats,
            unbinned,
            elapsed_seconds: 0.0,
            output: String::new(),
        }
    }

    #[must_use]
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed_seconds = elapsed.as_secs_f64();
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        let s = &self.stats;
        let convergence = if s.converged {
            "converged"
        } else {
            "did not converge"
        };
        let mut lines = vec![
            format!("\nGraphBin refinement ({} assembly)", self.assembler),
            format!("   Started: {}", self.started_at),
            format!(
                "\n   Graph: {} contigs, {} edges",
                self.contigs, self.edges
            ),
            format!(
                "   Initial binning: {} contigs in {} bins",
                s.initially_binned, self.bins
            ),
            format!(
                "   Removed as ambiguous: {} by neighbours, {} by distance",
                s.neighbor_removed, s.distance_removed
            ),
            format!(
                "   Propagation: {} eligible, {} excluded, {} newly binned ({} iterations, {})",
                s.eligible, s.excluded, s.propagated, s.iterations, convergence
            ),
            format!("   Removed after merge: {}", s.cleanup_removed),
            format!(
                "\n   Final: {} binned, {} unbinned",
                s.finally_binned, self.unbinned
            ),
        ];
        if !self.output.is_empty() {
            lines.push(format!("   Output: {}", self.output));
        }
        lines.push(format!("   Elapsed: {:.2}s", self.elapsed_seconds));
        lines.join("\n")
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    #[must_use]
    pub fn to_tsv(&self) -> String {
        let s = &self.stats;
        let header = "assembler\tcontigs\tedges\tbins\tinitially_binned\tneighbor_removed\tdistance_removed\teligible\texcluded\tpropagated\titerations\tconverged\tcleanup_removed\tfinally_binned\tunbinned\telapsed_seconds";
        format!(
            "{header}\n{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.3}",
            self.assembler,
            self.contigs,
            self.edges,
            self.bins,
            s.initially_binned,
            s.neighbor_removed,
            s.distance_removed,
            s.eligible,
            s.excluded,
            s.propagated,
            s.iterations,
            s.converged,
            s.cleanup_removed,
            s.finally_binned,
            self.unbinned,
            self.elapsed_seconds,
        )
    }
}
