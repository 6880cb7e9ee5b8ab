//! Error types for distribution operations.
//!
//! Filesystem failures carry the operation and path that failed via
//! [`ErrorExt::fs_context`]; missing optional values are turned into errors
//! with [`Context`].

use std::{fmt::Display, path::PathBuf};
use thiserror::Error as DeriveError;

/// Result type alias for distribution operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the distribution pipeline
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Free-form error message
    #[error("{0}")]
    GenericError(String),

    /// Filesystem operation failed on a known path
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// What was being done when the error occurred
        context: &'static str,
        /// Path involved in the failing operation
        path: PathBuf,
        /// Underlying IO error
        error: std::io::Error,
    },

    /// Manifest could not be parsed as XML
    #[error("failed to parse manifest {}: {reason}", path.display())]
    XmlParse {
        /// Manifest path
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// Manifest could not be serialized
    #[error("failed to write manifest {}: {reason}", path.display())]
    XmlWrite {
        /// Manifest path
        path: PathBuf,
        /// Emitter message
        reason: String,
    },

    /// Invalid output file pattern
    #[error("invalid output file pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    /// A matched path could not be read during pattern enumeration
    #[error("failed to enumerate output files: {0}")]
    Glob(#[from] glob::GlobError),

    /// Command string has no executable/argument separator
    #[error(
        "command `{0}` has no space between executable and arguments \
         (executable paths containing spaces are not supported)"
    )]
    MalformedCommand(String),

    /// Command arguments could not be tokenised
    #[error("command `{command}` has unbalanced quoting: {reason}")]
    CommandArguments {
        /// Command text
        command: String,
        /// Tokeniser message
        reason: String,
    },

    /// Executable could not be located on PATH or relative to the location
    #[error("executable `{executable}` not found: {reason}")]
    CommandNotFound {
        /// Executable name as configured
        executable: String,
        /// Lookup failure message
        reason: String,
    },

    /// Command could not be spawned
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command text
        command: String,
        /// Spawn error
        error: std::io::Error,
    },

    /// Command exited unsuccessfully while running in strict mode
    #[error("command `{command}` exited with {}", describe_exit(.code))]
    CommandStatus {
        /// Command text
        command: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
    },

    /// Unknown text encoding label
    #[error("unknown text encoding `{0}`")]
    UnknownEncoding(String),

    /// Blocking task panicked or was cancelled
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Attaches filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wraps an IO error with the operation being performed and its path.
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Converts an absent value into an error.
pub trait Context<T> {
    /// Returns the value or an error carrying `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::distribution::Error::GenericError($msg.into()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::distribution::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
