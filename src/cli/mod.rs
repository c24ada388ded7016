//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod ask;
pub mod config;
pub mod explore;
pub mod search;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Map search and geography assistant
#[derive(Parser)]
#[command(name = "pinpoint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for places
    Search(search::SearchArgs),

    /// Ask the geography assistant
    Ask(ask::AskArgs),

    /// Run a headless map session: search, select, report the viewport
    Explore(explore::ExploreArgs),

    /// Start the assistant API server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show credential and server status
    Status(status::StatusArgs),
}

/// Install the tracing subscriber; `RUST_LOG` overrides `default`
pub(crate) fn init_logging(default: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Ask(args) => ask::run(args).await,
        Commands::Explore(args) => explore::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
    }
}
