//! DigiBlog CLI.
//!
//! Commands:
//! - `serve`: start the web server
//! - `catalog build`: generate the search catalog from local documents

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CatalogCommand, ServeArgs};
use error::CliError;
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// DigiBlog - teaching materials for Digitale Grundbildung.
#[derive(Parser)]
#[command(name = "digi", version, about)]
struct Cli {
    /// Log at info level (otherwise RUST_LOG applies).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server.
    Serve(ServeArgs),
    /// Search catalog commands.
    #[command(subcommand)]
    Catalog(CatalogCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli.command) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(args.execute(VERSION))
        }
        Commands::Catalog(cmd) => cmd.execute(),
    }
}
