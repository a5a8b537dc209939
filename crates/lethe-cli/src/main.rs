//! Lethe CLI - stale-tag cleaner for Docker/OCI registries.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lethe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean(args) => commands::clean::run(&args).await,
        Commands::Check(args) => commands::check::run(&args),
        Commands::Version => {
            println!("lethe {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
