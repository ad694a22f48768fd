use clap::Parser;
use tracing_subscriber::EnvFilter;

use graphbin::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("graphbin=debug,info")
    } else {
        EnvFilter::new("graphbin=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Refine(args) => {
            cli::refine::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Graph(args) => {
            cli::graph::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
