//! Collection of build outputs into the distribution folder.

use crate::distribution::{error::Result, utils::fs};
use std::path::{Path, PathBuf};

/// Separator between output file patterns.
pub const PATTERN_SEPARATOR: char = ';';

/// Copies files matching `patterns` under `location` into `output`.
///
/// Patterns are `;`-delimited globs relative to `location`, processed in
/// order. Each match is copied by file name only, replacing any file of that
/// name already in `output`. Returns the destination paths in copy order.
pub async fn collect_artifacts(
    patterns: &str,
    location: &Path,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    let mut collected = Vec::new();

    for pattern in patterns
        .split(PATTERN_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        let matches = matching_files(location, pattern).await?;
        if matches.is_empty() {
            log::debug!("No files match `{pattern}` in {}", location.display());
        }

        for source in matches {
            let Some(name) = source.file_name() else {
                continue;
            };
            let destination = output.join(name);
            fs::copy_file(&source, &destination).await?;
            log::info!("✓ Collected {}", destination.display());
            collected.push(destination);
        }
    }

    Ok(collected)
}

/// Regular files matching `pattern` relative to `location`.
async fn matching_files(location: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&location.to_string_lossy());
    let full = Path::new(&base).join(pattern).to_string_lossy().into_owned();

    tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in glob::glob(&full)? {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Error;

    #[tokio::test]
    async fn copies_matches_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin/Release");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("Acme.1.0.0.nupkg"), b"pkg").unwrap();
        std::fs::write(bin.join("Acme.1.0.0.snupkg"), b"sym").unwrap();
        std::fs::write(bin.join("Acme.dll"), b"dll").unwrap();
        let out = dir.path().join("dist");
        std::fs::create_dir(&out).unwrap();

        let patterns = "bin/Release/*.nupkg; bin/Release/*.snupkg;";
        let collected = collect_artifacts(patterns, dir.path(), &out).await.unwrap();

        assert_eq!(
            collected,
            vec![out.join("Acme.1.0.0.nupkg"), out.join("Acme.1.0.0.snupkg")]
        );
        assert_eq!(std::fs::read(out.join("Acme.1.0.0.nupkg")).unwrap(), b"pkg");
        assert!(!out.join("Acme.dll").exists());
    }

    #[tokio::test]
    async fn overwrites_existing_outputs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Acme.1.0.0.nupkg"), b"fresh").unwrap();
        let out = dir.path().join("dist");
        std::fs::create_dir(&out).unwrap();
        std::fs::write(out.join("Acme.1.0.0.nupkg"), b"stale").unwrap();

        collect_artifacts("*.nupkg", dir.path(), &out).await.unwrap();

        assert_eq!(std::fs::read(out.join("Acme.1.0.0.nupkg")).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn directories_are_not_collected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.nupkg")).unwrap();
        let out = dir.path().join("dist");
        std::fs::create_dir(&out).unwrap();

        let collected = collect_artifacts("*.nupkg", dir.path(), &out).await.unwrap();

        assert!(collected.is_empty());
    }

    #[tokio::test]
    async fn location_with_glob_characters_is_literal() {
        let root = tempfile::tempdir().unwrap();
        let location = root.path().join("build[1]");
        std::fs::create_dir(&location).unwrap();
        std::fs::write(location.join("a.nupkg"), b"a").unwrap();
        let out = root.path().join("dist");
        std::fs::create_dir(&out).unwrap();

        let collected = collect_artifacts("*.nupkg", &location, &out).await.unwrap();

        assert_eq!(collected, vec![out.join("a.nupkg")]);
    }

    #[tokio::test]
    async fn invalid_pattern_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_artifacts("[", dir.path(), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::GlobPattern(_)));
    }
}
