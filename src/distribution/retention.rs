//! Pruning of superseded packages from the output directory.

use crate::distribution::{
    error::{ErrorExt, Result},
    identity::group_by_identity,
};
use std::{
    cmp::Reverse,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// Extension suffix, matched case-insensitively, of files subject to pruning.
pub const PACKAGE_EXTENSION_SUFFIX: &str = "nupkg";

#[derive(Debug)]
struct PackageFile {
    path: PathBuf,
    name: String,
    created: SystemTime,
}

/// Keeps only the most recently created package of each identity in `output`.
///
/// Files directly in `output` whose extension ends with `nupkg` are grouped
/// by [`package_identity`](super::identity::package_identity). Within a
/// group, the newest file by creation time survives; ties go to the greater
/// file name. Every other member is deleted. Returns the deleted paths.
pub async fn prune_superseded(output: &Path) -> Result<Vec<PathBuf>> {
    let packages = package_files(output).await?;
    let mut removed = Vec::new();

    let groups = group_by_identity(packages, |p: &PackageFile| p.name.as_str());
    for (identity, mut members) in groups {
        members.sort_by_key(|p| Reverse((p.created, p.name.clone())));

        let mut members = members.into_iter();
        if let Some(kept) = members.next() {
            log::debug!("Keeping {} for identity `{}`", kept.name, identity);
        }
        for stale in members {
            tokio::fs::remove_file(&stale.path)
                .await
                .fs_context("removing superseded package", &stale.path)?;
            log::info!("✓ Removed superseded package {}", stale.name);
            removed.push(stale.path);
        }
    }

    Ok(removed)
}

async fn package_files(output: &Path) -> Result<Vec<PackageFile>> {
    let output = output.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<Vec<PackageFile>> {
        let mut packages = Vec::new();
        let entries =
            std::fs::read_dir(&output).fs_context("reading output directory", &output)?;

        for entry in entries {
            let entry = entry.fs_context("reading output directory entry", &output)?;
            let path = entry.path();
            if !is_package(&path) {
                continue;
            }

            let metadata = entry
                .metadata()
                .fs_context("reading package metadata", &path)?;
            if !metadata.is_file() {
                continue;
            }

            // Not every filesystem records birth time.
            let created = metadata
                .created()
                .or_else(|_| metadata.modified())
                .fs_context("reading package timestamps", &path)?;

            packages.push(PackageFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                created,
            });
        }

        Ok(packages)
    })
    .await?
}

fn is_package(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            ext.to_string_lossy()
                .to_ascii_lowercase()
                .ends_with(PACKAGE_EXTENSION_SUFFIX)
        })
        .unwrap_or(false)
}
