//! Include lists naming extra files to inject into the package manifest.
//!
//! One include per line, `source => destination`. Blank lines and lines
//! starting with `#` are ignored. A line without `=>` targets the package
//! root (empty destination).

use super::TextEncoding;
use crate::distribution::{Result, error::ErrorExt};
use std::path::Path;

const ARROW: &str = "=>";

/// One extra file to add to the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeEntry {
    /// Source path, relative to the project location; may contain placeholders.
    pub source: String,
    /// Destination path inside the package; may contain placeholders.
    pub destination: String,
}

impl IncludeEntry {
    /// Creates an include entry.
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Ordered include list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageContents {
    entries: Vec<IncludeEntry>,
}

impl PackageContents {
    /// Reads an include list from `path`.
    pub async fn load(path: &Path, encoding: TextEncoding) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .fs_context("reading include list", path)?;
        let contents = Self::parse(&encoding.decode(&bytes));
        log::debug!(
            "Read {} include(s) from {}",
            contents.len(),
            path.display()
        );
        Ok(contents)
    }

    /// Parses include list text.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| match line.split_once(ARROW) {
                Some((source, destination)) => IncludeEntry::new(source.trim(), destination.trim()),
                None => IncludeEntry::new(line, ""),
            })
            .collect();
        Self { entries }
    }

    /// Iterates the entries in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, IncludeEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<IncludeEntry> for PackageContents {
    fn from_iter<I: IntoIterator<Item = IncludeEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PackageContents {
    type Item = &'a IncludeEntry;
    type IntoIter = std::slice::Iter<'a, IncludeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
