//! Post-build packaging orchestrator library
//!
//! This library runs the distribution steps that follow a project build:
//! - Merge extra files from include lists into the `.nuspec` manifest
//! - Run configured packaging and signing commands in sequence
//! - Collect matching outputs into the distribution folder
//! - Prune superseded package versions, keeping the newest per package
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod distribution;
pub mod error;

// Re-export commonly used types
pub use error::{CliError, MasonError, Result};
