//! Post-build distribution pipeline.
//!
//! This module provides the [`Distributor`] orchestrator and the steps it
//! runs for a project:
//!
//! - [`manifest`] - merge include lists into the `.nuspec` manifest
//! - [`commands`] - run configured packaging and signing commands in sequence
//! - [`collector`] - copy matching build outputs into the output directory
//! - [`retention`] - prune superseded packages, newest per identity wins
//! - [`identity`] - version-independent package identity from a file name
//! - [`orchestrator`] - the [`Distributor`] tying the steps together
//!
//! Settings come from build properties through [`DistributionSettings`].

pub mod collector;
pub mod commands;
pub mod error;
pub mod identity;
pub mod manifest;
pub mod orchestrator;
pub mod retention;
pub mod settings;
pub mod utils;

pub use collector::collect_artifacts;
pub use commands::{Command, CommandOutcome, CommandRunner, parse_commands};
pub use error::{Error, Result};
pub use identity::{group_by_identity, package_identity};
pub use manifest::{MANIFEST_TEMPLATE, ManifestMerger, MergeOutcome};
pub use orchestrator::{DistributionReport, Distributor, PACKAGE_INCLUDE_FILE, distribute};
pub use retention::prune_superseded;
pub use settings::DistributionSettings;
