//! Clean command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use lethe_core::Engine;
use lethe_registry::RegistryClient;

use crate::config::Config;

/// Arguments for the clean command.
#[derive(Args)]
pub struct CleanArgs {
    /// Configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Compute and report deletions without performing them (overrides the
    /// configuration file)
    #[arg(long)]
    pub dry_run: bool,
}

/// Runs the clean command.
pub async fn run(args: &CleanArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let dry_run = config.dry_run || args.dry_run;

    let rules = config.rule_set()?;
    info!(
        registry = %config.docker_registry.url,
        exceptions = rules.exceptions().len(),
        dry_run,
        "Starting cleanup run"
    );

    let client = RegistryClient::new(config.registry_config()?)?;
    let engine = Engine::new(rules);
    let summary = engine.run(&client, dry_run).await?;

    if summary.dry_run {
        println!(
            "dry run: {} tag(s) would be deleted",
            summary.deletions.len()
        );
    }
    Ok(())
}
