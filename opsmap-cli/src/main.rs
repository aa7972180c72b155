//! OpsMap CLI - Command-line interface
//!
//! Diagnostics for the facility map engine: runs a real map session
//! against a live backend with a log-backed render surface.

use clap::{Parser, Subcommand};

use crate::error::CliError;
use opsmap::logging;

mod commands;
mod error;

#[derive(Parser)]
#[command(name = "opsmap")]
#[command(version = opsmap::VERSION)]
#[command(about = "Facility map diagnostics against a live backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch all three datasets once and report counts, errors and camera moves
    Snapshot(commands::SnapshotArgs),
    /// Fetch once, then run a search query against the held datasets
    Search(commands::SearchArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _guard =
        match logging::init_logging(logging::default_log_dir(), logging::default_log_file()) {
            Ok(guard) => guard,
            Err(e) => CliError::LoggingInit(e.to_string()).exit(),
        };

    let result = match cli.command {
        Command::Snapshot(args) => commands::snapshot(args).await,
        Command::Search(args) => commands::search(args).await,
    };

    if let Err(e) = result {
        e.exit();
    }
}
