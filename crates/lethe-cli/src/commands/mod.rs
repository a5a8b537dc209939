//! CLI commands and argument parsing.

pub mod check;
pub mod clean;

use clap::{Parser, Subcommand};

/// Lethe - stale-tag cleaner for Docker/OCI registries
#[derive(Parser)]
#[command(name = "lethe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Scan the registry and delete stale tags
    Clean(clean::CleanArgs),

    /// Validate a configuration file without touching the registry
    Check(check::CheckArgs),

    /// Print version information
    Version,
}
