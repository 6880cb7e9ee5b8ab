//! Main distribution orchestration.
//!
//! This module provides the [`Distributor`] that runs the post-build
//! distribution steps for one project in order.

use crate::{
    config::{BuildConfig, PropertySource, TextEncoding},
    distribution::{
        CommandOutcome, CommandRunner, DistributionSettings, ManifestMerger, MergeOutcome,
        Result, collect_artifacts, prune_superseded, settings::properties, utils::fs,
    },
};
use std::path::{Path, PathBuf};

/// Include list shared by every project in a location.
pub const PACKAGE_INCLUDE_FILE: &str = "mason.nuspec-includes.txt";

/// What a distribution run did.
#[derive(Debug, Default)]
pub struct DistributionReport {
    /// Include merge result; `None` when no include list exists.
    pub merge: Option<MergeOutcome>,
    /// Resolved output directory; `None` when the property is undefined.
    pub output_location: Option<PathBuf>,
    /// Outcome of each executed command, in order.
    pub commands: Vec<CommandOutcome>,
    /// Files copied into the output directory.
    pub collected: Vec<PathBuf>,
    /// Superseded packages deleted from the output directory.
    pub pruned: Vec<PathBuf>,
}

/// Post-build distribution orchestrator.
///
/// Runs, in order:
/// 1. load the build configuration
/// 2. merge the include list into the package manifest
/// 3. ensure the output directory exists
/// 4. run configured commands
/// 5. collect output files
/// 6. prune superseded packages
///
/// All relative paths resolve against the project location passed to
/// [`Distributor::new`]; the process working directory is left alone.
///
/// # Examples
///
/// ```no_run
/// use mason_packager::{config::TextEncoding, distribution::Distributor};
///
/// # async fn example() -> mason_packager::distribution::Result<()> {
/// let report = Distributor::new("/src/acme", "Acme.Tools", TextEncoding::utf_8())
///     .distribute()
///     .await?;
/// println!("collected {} file(s)", report.collected.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Distributor {
    location: PathBuf,
    project_name: String,
    encoding: TextEncoding,
    strict_commands: bool,
}

impl Distributor {
    /// Creates a distributor for `project_name` at `location`.
    pub fn new(
        location: impl Into<PathBuf>,
        project_name: impl Into<String>,
        encoding: TextEncoding,
    ) -> Self {
        Self {
            location: location.into(),
            project_name: project_name.into(),
            encoding,
            strict_commands: false,
        }
    }

    /// Forces strict command handling regardless of build properties.
    pub fn strict_commands(mut self, strict: bool) -> Self {
        self.strict_commands = strict;
        self
    }

    /// Project location all relative paths resolve against.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Loads the build configuration and runs every step.
    pub async fn distribute(&self) -> Result<DistributionReport> {
        let config = BuildConfig::load(&self.location, &self.project_name, self.encoding).await?;
        self.distribute_with(&config).await
    }

    /// Runs every step against an already-loaded configuration.
    ///
    /// An undefined output location stops the run after the manifest merge
    /// with a notice on standard output; it is not an error.
    pub async fn distribute_with(
        &self,
        config: &dyn PropertySource,
    ) -> Result<DistributionReport> {
        let settings = DistributionSettings::from_config(config)
            .with_strict_commands(self.strict_commands);
        let mut report = DistributionReport::default();

        if let Some(include_list) = self.include_list().await {
            let merger = ManifestMerger::new(config, &settings, &self.location, self.encoding);
            report.merge = Some(merger.merge(&include_list).await?);
        }

        let Some(output_location) = settings.output_location() else {
            println!(
                "Cannot run distribution task. Property '{}' is not defined in build.properties",
                properties::OUTPUT_LOCATION
            );
            return Ok(report);
        };
        let output = self.location.join(output_location);
        fs::create_dir_all(&output).await?;
        report.output_location = Some(output.clone());

        if let Some(commands) = settings.commands() {
            report.commands = CommandRunner::new(&self.location)
                .strict(settings.strict_commands())
                .run_all(commands)
                .await?;
        }

        if let Some(patterns) = settings.output_file_patterns() {
            report.collected = collect_artifacts(patterns, &self.location, &output).await?;
        }

        if settings.output_auto_remove() {
            report.pruned = prune_superseded(&output).await?;
        }

        Ok(report)
    }

    /// Project include list if present, else the shared one, else `None`.
    pub async fn include_list(&self) -> Option<PathBuf> {
        let candidates = [
            self.location
                .join(format!("{}.{PACKAGE_INCLUDE_FILE}", self.project_name)),
            self.location.join(PACKAGE_INCLUDE_FILE),
        ];

        for candidate in candidates {
            if fs::exists(&candidate).await {
                return Some(candidate);
            }
        }
        None
    }
}

/// Runs distribution for `project_name` at `location` with default options.
pub async fn distribute(
    location: &Path,
    project_name: &str,
    encoding: TextEncoding,
) -> Result<DistributionReport> {
    Distributor::new(location, project_name, encoding)
        .distribute()
        .await
}
