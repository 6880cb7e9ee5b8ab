//! Command line interface for the packager.
//!
//! This module provides argument parsing, dispatch to the distribution
//! pipeline, and a summary of what the run did.

mod args;

pub use args::{Args, RuntimeConfig};

use crate::{
    distribution::{DistributionReport, Distributor, MergeOutcome},
    error::{CliError, Result},
};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let config = RuntimeConfig::try_from(&args)
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    execute(&config).await
}

/// Runs distribution for an already-parsed configuration
pub async fn execute(config: &RuntimeConfig) -> Result<i32> {
    log::info!(
        "Distributing {} from {}",
        config.project(),
        config.location().display()
    );

    let report = Distributor::new(config.location(), config.project(), config.encoding())
        .strict_commands(config.strict())
        .distribute()
        .await?;

    summarize(&report);
    Ok(0)
}

fn summarize(report: &DistributionReport) {
    match &report.merge {
        Some(MergeOutcome::Merged { manifest, added, .. }) => {
            log::debug!("Manifest {} gained {} file(s)", manifest.display(), added);
        }
        Some(MergeOutcome::ManifestMissing(path)) => {
            log::debug!("Include list ignored, no manifest at {}", path.display());
        }
        Some(MergeOutcome::NoRoot(path)) => {
            log::debug!("Include list ignored, {} has no root element", path.display());
        }
        None => {}
    }

    let Some(output) = &report.output_location else {
        return;
    };

    let failed = report.commands.iter().filter(|c| !c.success()).count();
    log::info!(
        "✓ Distribution finished in {}: {} command(s) ({} failed), {} file(s) collected, {} pruned",
        output.display(),
        report.commands.len(),
        failed,
        report.collected.len(),
        report.pruned.len()
    );
}
