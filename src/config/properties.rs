//! Build properties loaded from `build.properties` files.

use super::{PropertySource, TextEncoding};
use crate::distribution::{Result, utils::fs};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// Shared properties file in the project location.
pub const BUILD_PROPERTIES_FILE: &str = "build.properties";

/// Built-in property holding the project name.
pub const PROJECT_NAME_PROPERTY: &str = "project.name";

/// Built-in property holding the project location.
pub const PROJECT_LOCATION_PROPERTY: &str = "project.location";

/// Build configuration for one project.
///
/// Populated from, in order of increasing precedence:
/// 1. built-in `project.name` and `project.location`
/// 2. `{location}/build.properties`
/// 3. `{location}/{project}.build.properties`
///
/// Missing files are skipped.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    properties: HashMap<String, String>,
    sources: Vec<PathBuf>,
}

impl BuildConfig {
    /// Loads the configuration for `project_name` at `location`.
    pub async fn load(
        location: &Path,
        project_name: &str,
        encoding: TextEncoding,
    ) -> Result<Self> {
        let mut config = Self::default();
        config.set(PROJECT_NAME_PROPERTY, project_name);
        config.set(PROJECT_LOCATION_PROPERTY, location.display().to_string());

        let candidates = [
            location.join(BUILD_PROPERTIES_FILE),
            location.join(format!("{project_name}.{BUILD_PROPERTIES_FILE}")),
        ];

        for path in candidates {
            let Some(bytes) = fs::read_optional(&path, "reading build properties").await? else {
                log::debug!("No properties file at {}", path.display());
                continue;
            };

            let count = config.merge_text(&encoding.decode(&bytes));
            log::debug!("Loaded {} properties from {}", count, path.display());
            config.sources.push(path);
        }

        Ok(config)
    }

    /// Parses properties from text, without touching the filesystem.
    pub fn from_text(text: &str) -> Self {
        let mut config = Self::default();
        config.merge_text(text);
        config
    }

    /// Defines or replaces a property.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Files the configuration was read from, in load order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Number of defined properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no properties are defined.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn merge_text(&mut self, text: &str) -> usize {
        let mut count = 0;
        for (key, value) in text.lines().filter_map(parse_line) {
            self.set(key, value);
            count += 1;
        }
        count
    }
}

impl PropertySource for BuildConfig {
    fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Parses `key=value` or `key: value`; the first separator wins.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
        return None;
    }

    match line.find(['=', ':']) {
        Some(0) => None,
        Some(index) => Some((line[..index].trim(), line[index + 1..].trim())),
        None => Some((line, "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_separators_and_skips_comments() {
        let config = BuildConfig::from_text(
            "# comment\n\
             ! also a comment\n\
             \n\
             id = Acme.Tools\n\
             package.output.location: ../dist\n\
             package.commands=nuget pack ${id}.nuspec|signtool sign x=y\n",
        );

        assert_eq!(config.property("id"), Some("Acme.Tools"));
        assert_eq!(config.property("package.output.location"), Some("../dist"));
        assert_eq!(
            config.property("package.commands"),
            Some("nuget pack ${id}.nuspec|signtool sign x=y")
        );
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn key_without_value_is_defined_empty() {
        let config = BuildConfig::from_text("flag\n=orphan\n");
        assert_eq!(config.property("flag"), Some(""));
        assert_eq!(config.len(), 1);
    }

    #[tokio::test]
    async fn project_file_overrides_shared_file() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("build.properties"), "id=Shared\nversion=1.0.0\n")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("App.build.properties"), "id=App\n")
            .await
            .unwrap();

        let config = BuildConfig::load(dir.path(), "App", TextEncoding::utf_8())
            .await
            .unwrap();

        assert_eq!(config.property("id"), Some("App"));
        assert_eq!(config.property("version"), Some("1.0.0"));
        assert_eq!(config.property(PROJECT_NAME_PROPERTY), Some("App"));
        assert_eq!(config.sources().len(), 2);
    }

    #[tokio::test]
    async fn missing_files_yield_builtins_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfig::load(dir.path(), "App", TextEncoding::utf_8())
            .await
            .unwrap();

        assert!(config.sources().is_empty());
        assert_eq!(config.len(), 2);
        assert_eq!(config.property("package.output.location"), None);
    }

    #[tokio::test]
    async fn decodes_with_configured_encoding() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("build.properties"), b"authors=Ren\xE9\n")
            .await
            .unwrap();
        let latin = TextEncoding::for_label("windows-1252").unwrap();

        let config = BuildConfig::load(dir.path(), "App", latin).await.unwrap();

        assert_eq!(config.property("authors"), Some("René"));
    }
}
