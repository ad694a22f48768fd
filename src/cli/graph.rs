//! Graph command - build the contig adjacency graph and report its shape.

use clap::Args;

use crate::cli::{AssemblyArgs, OutputFormat};
use crate::graph::build_graph;
use crate::parsing::assembly::load_records;

/// Arguments for the graph command
#[derive(Args)]
pub struct GraphArgs {
    #[command(flatten)]
    pub assembly: AssemblyArgs,
}

/// Execute the graph command
///
/// # Errors
///
/// Returns an error if the assembly files cannot be parsed or are
/// inconsistent with each other.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: GraphArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    args.assembly.validate()?;

    let assembly = &args.assembly;
    let records = load_records(assembly.assembler, &assembly.graph, assembly.paths.as_deref())?;
    let graph = build_graph(&records)?;

    let nodes = graph.node_count();
    let edges = graph.edge_count();
    let isolated = graph.isolated_count();

    match format {
        OutputFormat::Text => {
            println!("\nAssembly graph ({})", assembly.assembler);
            println!("   Contigs: {nodes}");
            println!("   Edges: {edges}");
            println!("   Isolated contigs: {isolated}");
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "assembler": assembly.assembler,
                "contigs": nodes,
                "edges": edges,
                "isolated": isolated,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("assembler\tcontigs\tedges\tisolated");
            println!("{}\t{nodes}\t{edges}\t{isolated}", assembly.assembler);
        }
    }

    Ok(())
}
