//! POUNCE CLI - Command-line interface
//!
//! Commands:
//! - simulate: Autopilot hunters against the computer evader
//! - new: Write a fresh save file
//! - inspect: Summarize a save file

mod save_cmd;
mod simulate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pounce")]
#[command(about = "Headless tools for the POUNCE evader-vs-hunters game")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log rule events at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play computer-vs-computer games and report statistics
    Simulate(simulate::SimulateArgs),
    /// Write a fresh save file
    New(save_cmd::NewArgs),
    /// Print the contents of a save file
    Inspect(save_cmd::InspectArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Simulate(args) => simulate::run(args, cli.seed),
        Commands::New(args) => save_cmd::run_new(args, cli.seed),
        Commands::Inspect(args) => save_cmd::run_inspect(args),
    }
}

/// `RUST_LOG` wins over the --verbose default
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
