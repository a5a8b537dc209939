//! Check command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::Config;

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config: PathBuf,
}

/// Runs the check command.
pub fn run(args: &CheckArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let rules = config.rule_set()?;

    println!("Lethe Configuration Check");
    println!("=========================");
    println!("File: {}", args.config.display());
    println!("Registry: {}", config.docker_registry.url);
    println!("Dry run: {}", config.dry_run);

    let default = rules.default_rule();
    println!(
        "Default rule: keep {} tag(s), {} day(s), keep latest: {}",
        default.tags_to_keep, default.days_to_keep, default.keep_latest
    );
    println!("Exceptions: {}", rules.exceptions().len());
    for exception in rules.exceptions() {
        let rule = exception.rule();
        println!(
            "  [{}] keep {} tag(s), {} day(s), keep latest: {}",
            exception.label(),
            rule.tags_to_keep,
            rule.days_to_keep,
            rule.keep_latest
        );
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}
