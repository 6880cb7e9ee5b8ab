//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap,
//! with validation and conversion into a [`RuntimeConfig`].

use crate::config::TextEncoding;
use clap::Parser;
use path_absolutize::Absolutize;
use std::path::PathBuf;

/// Post-build packaging orchestrator
#[derive(Parser, Debug)]
#[command(
    name = "mason_packager",
    version,
    about = "Post-build packaging orchestrator",
    long_about = "Merges extra files into the project's .nuspec manifest, runs the configured
packaging commands, collects output files into the distribution folder and prunes
superseded package versions.

Settings are read from build.properties and {project}.build.properties in the
project location:
  package.output.location        output directory (required for everything but the merge)
  package.commands               commands to run, separated by |
  package.output.files           files to collect, glob patterns separated by ;
  package.output.autoremove      keep only the newest .nupkg per package
  package.exclude-missing-files  skip includes whose source does not exist
  package.commands.strict        stop at the first failing command

Usage:
  mason_packager --project Acme.Tools
  mason_packager --location ./src/Acme.Tools --project Acme.Tools --encoding windows-1252"
)]
pub struct Args {
    /// Project location; relative paths in the configuration resolve against it
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub location: PathBuf,

    /// Project name, used to find {project}.build.properties and include lists
    #[arg(short, long, value_name = "NAME")]
    pub project: String,

    /// Text encoding of properties, include lists and the manifest
    #[arg(short, long, value_name = "LABEL", default_value = "utf-8", env = "MASON_ENCODING")]
    pub encoding: String,

    /// Stop at the first command that exits unsuccessfully
    #[arg(long)]
    pub strict: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        let project = self.project.trim();
        if project.is_empty() {
            return Err("Project name cannot be empty".to_string());
        }
        if project.contains(['/', '\\']) {
            return Err(format!(
                "Project name must not contain path separators: {}",
                self.project
            ));
        }

        if TextEncoding::for_label(&self.encoding).is_err() {
            return Err(format!("Unknown text encoding: {}", self.encoding));
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    location: PathBuf,
    project: String,
    encoding: TextEncoding,
    strict: bool,
}

impl TryFrom<&Args> for RuntimeConfig {
    type Error = String;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        args.validate()?;

        let location = args
            .location
            .absolutize()
            .map_err(|e| format!("Cannot resolve {}: {}", args.location.display(), e))?
            .into_owned();
        let encoding = TextEncoding::for_label(&args.encoding).map_err(|e| e.to_string())?;

        Ok(Self {
            location,
            project: args.project.trim().to_string(),
            encoding,
            strict: args.strict,
        })
    }
}

impl RuntimeConfig {
    /// Absolute project location
    pub fn location(&self) -> &std::path::Path {
        &self.location
    }

    /// Project name
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Resolved text encoding
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Whether strict command handling was requested
    pub fn strict(&self) -> bool {
        self.strict
    }
}
