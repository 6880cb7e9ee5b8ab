//! File system utilities for distribution.
//!
//! Thin wrappers over `tokio::fs` that attach path context to errors and
//! make directory creation idempotent.

use crate::distribution::error::{Error, ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Creates `path` and all missing parents. Succeeds if it already exists.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Returns whether `path` exists, treating unreadable paths as absent.
pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Reads a file, returning `None` if it does not exist.
pub async fn read_optional(path: &Path, context: &'static str) -> Result<Option<Vec<u8>>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).fs_context(context, path),
    }
}

/// Copies a regular file, replacing any existing file at `to`.
///
/// Fails if the source path is a directory or doesn't exist. Copying a file
/// onto itself is a no-op rather than a truncation.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let metadata = fs::metadata(from)
        .await
        .fs_context("reading source metadata", from)?;
    if !metadata.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }

    if same_file(from, to).await {
        log::debug!("Skipping copy of {} onto itself", from.display());
        return Ok(());
    }

    if let Some(dest_dir) = to.parent() {
        create_dir_all(dest_dir).await?;
    }
    fs::copy(from, to).await.fs_context("copying file to", to)?;
    Ok(())
}

async fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a).await, fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
