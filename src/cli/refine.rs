//! Refine command - the full graph-based refinement of an initial binning.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use tracing::warn;

use crate::cli::{AssemblyArgs, OutputFormat};
use crate::graph::build_graph;
use crate::output::summary::RunSummary;
use crate::output::writer::{write_results, OutputPaths};
use crate::parsing::assembly::load_records;
use crate::parsing::bins::{build_assignment, parse_bins_file};
use crate::refine::propagation::{DEFAULT_DIFF_THRESHOLD, DEFAULT_MAX_ITERATION};
use crate::refine::{LabelPropagation, PropagationParams, RefineConfig, RefinePipeline};
use crate::utils::validation::{ensure_output_dir, normalize_prefix, validate_prefix};

/// Arguments for the refine command
#[derive(Args)]
pub struct RefineArgs {
    #[command(flatten)]
    pub assembly: AssemblyArgs,

    /// Initial binning result as `contig,bin` CSV (may be gzipped)
    #[arg(long)]
    pub binned: PathBuf,

    /// Directory for the result files (created if missing)
    #[arg(long)]
    pub output: PathBuf,

    /// Prefix for the result file names
    #[arg(long)]
    pub prefix: Option<String>,

    /// Maximum number of label propagation iterations
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATION, value_parser = parse_max_iteration)]
    pub max_iteration: usize,

    /// Stop propagating once confidences change by less than this
    #[arg(long, default_value_t = DEFAULT_DIFF_THRESHOLD, value_parser = parse_diff_threshold)]
    pub diff_threshold: f64,

    /// Worker threads (0 uses all cores)
    #[arg(long, default_value = "0")]
    pub threads: usize,
}

impl RefineArgs {
    #[must_use]
    pub fn config(&self) -> RefineConfig {
        RefineConfig {
            params: PropagationParams {
                diff_threshold: self.diff_threshold,
                max_iteration: self.max_iteration,
            },
            threads: self.threads,
        }
    }
}

fn parse_max_iteration(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{s}' is not a whole number"))?;
    if n == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(n)
}

fn parse_diff_threshold(s: &str) -> Result<f64, String> {
    let f: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !f.is_finite() || f <= 0.0 {
        return Err("must be a positive number".to_string());
    }
    Ok(f)
}

/// Execute the refine command
///
/// # Errors
///
/// Returns an error if inputs cannot be parsed, the oracle breaks its
/// contract, or the result files cannot be written. Nothing is written unless
/// every earlier step succeeded.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: RefineArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let started_at = chrono::Utc::now().to_rfc3339();

    args.assembly.validate()?;

    let prefix = normalize_prefix(args.prefix.as_deref());
    validate_prefix(&prefix)?;
    ensure_output_dir(&args.output)?;

    let config = args.config();
    config.init_thread_pool();

    let assembly = &args.assembly;
    let records = load_records(assembly.assembler, &assembly.graph, assembly.paths.as_deref())
        .with_context(|| format!("Failed to read assembly graph {}", assembly.graph.display()))?;
    let graph = build_graph(&records)?;

    let entries = parse_bins_file(&args.binned)
        .with_context(|| format!("Failed to read binning result {}", args.binned.display()))?;
    let bins = build_assignment(&entries, &records.contigs)?;

    if verbose {
        eprintln!(
            "Graph: {} contigs, {} edges; {} contigs initially binned into {} bins",
            graph.node_count(),
            graph.edge_count(),
            bins.assigned_count(),
            bins.n_bins()
        );
    }
    if bins.n_bins() == 0 {
        warn!("The initial binning is empty; every contig will be unbinned");
    }

    let n_bins = bins.n_bins();
    let oracle = LabelPropagation::new();
    let outcome = RefinePipeline::new(&graph, &oracle, config.params).run(bins)?;

    let paths = OutputPaths::new(&args.output, &prefix);
    let isolated: Vec<_> = outcome.eligibility.excluded().collect();
    write_results(&paths, &outcome.bins, &isolated, &records.contigs)?;

    let summary = RunSummary::new(
        assembly.assembler,
        started_at,
        graph.node_count(),
        graph.edge_count(),
        n_bins,
        outcome.stats,
    )
    .with_output(paths.bins.display().to_string())
    .with_elapsed(start.elapsed());

    match format {
        OutputFormat::Text => println!("{}", summary.to_text()),
        OutputFormat::Json => println!("{}", summary.to_json()?),
        OutputFormat::Tsv => println!("{}", summary.to_tsv()),
    }

    Ok(())
}
