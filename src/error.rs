//! Top-level error types for the packager.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use crate::distribution::Error as DistributionError;
use thiserror::Error;

/// Result type alias for packager operations
pub type Result<T> = std::result::Result<T, MasonError>;

/// Main error type for all packager operations
#[derive(Error, Debug)]
pub enum MasonError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Distribution pipeline errors
    #[error("Distribution error: {0}")]
    Distribution(#[from] DistributionError),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl MasonError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            Self::Cli(_) => vec!["Run with --help to see accepted arguments".to_string()],
            Self::Distribution(DistributionError::MalformedCommand(_)) => vec![
                "Separate the executable from its arguments with a space".to_string(),
                "Move executables whose path contains spaces onto PATH".to_string(),
            ],
            Self::Distribution(DistributionError::CommandNotFound { .. }) => vec![
                "Check that the tool is installed and on PATH".to_string(),
                "Relative executable paths resolve against the project location".to_string(),
            ],
            Self::Distribution(DistributionError::CommandStatus { .. }) => vec![
                "Fix the failing command, or unset package.commands.strict to continue past failures"
                    .to_string(),
            ],
            Self::Distribution(DistributionError::XmlParse { .. }) => {
                vec!["Check that the .nuspec manifest is well-formed XML".to_string()]
            }
            Self::Distribution(DistributionError::UnknownEncoding(_)) => {
                vec!["Use a WHATWG encoding label such as utf-8 or windows-1252".to_string()]
            }
            Self::Distribution(DistributionError::GlobPattern(_)) => {
                vec!["Check the glob syntax in package.output.files".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
