use clap::Parser;
use tracing_subscriber::EnvFilter;

use srna_quant::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("srna_quant=debug,info")
    } else {
        EnvFilter::new("srna_quant=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Profile(args) => {
            cli::profile::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Compare(args) => {
            cli::compare::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Mirna(args) => {
            cli::mirna::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
