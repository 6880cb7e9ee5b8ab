//! Distribution settings resolved from build properties.

use crate::config::PropertySource;
use std::path::{Path, PathBuf};

/// Property names read by [`DistributionSettings::from_config`].
pub mod properties {
    /// Output directory for collected artifacts.
    pub const OUTPUT_LOCATION: &str = "package.output.location";
    /// Pipe-delimited commands to run before collection.
    pub const COMMANDS: &str = "package.commands";
    /// Semicolon-delimited file patterns to collect.
    pub const OUTPUT_FILE_PATTERNS: &str = "package.output.files";
    /// Prune superseded `.nupkg` files from the output directory.
    pub const OUTPUT_AUTO_REMOVE: &str = "package.output.autoremove";
    /// Skip include entries whose source file does not exist.
    pub const EXCLUDE_MISSING_FILES: &str = "package.exclude-missing-files";
    /// Stop the command sequence at the first non-zero exit status.
    pub const STRICT_COMMANDS: &str = "package.commands.strict";
}

/// Immutable view of the distribution-related build properties.
///
/// String values that are blank count as undefined.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistributionSettings {
    output_location: Option<PathBuf>,
    commands: Option<String>,
    output_file_patterns: Option<String>,
    output_auto_remove: bool,
    exclude_missing_files: bool,
    strict_commands: bool,
}

impl DistributionSettings {
    /// Resolves settings from a property source.
    pub fn from_config(config: &dyn PropertySource) -> Self {
        Self {
            output_location: text(config, properties::OUTPUT_LOCATION).map(PathBuf::from),
            commands: text(config, properties::COMMANDS),
            output_file_patterns: text(config, properties::OUTPUT_FILE_PATTERNS),
            output_auto_remove: flag(config, properties::OUTPUT_AUTO_REMOVE),
            exclude_missing_files: flag(config, properties::EXCLUDE_MISSING_FILES),
            strict_commands: flag(config, properties::STRICT_COMMANDS),
        }
    }

    /// Forces strict command handling on, e.g. from a CLI flag.
    ///
    /// A `false` argument keeps whatever the properties requested.
    pub fn with_strict_commands(mut self, strict: bool) -> Self {
        self.strict_commands |= strict;
        self
    }

    /// Configured output directory, as written in the properties.
    pub fn output_location(&self) -> Option<&Path> {
        self.output_location.as_deref()
    }

    /// Raw pipe-delimited command list.
    pub fn commands(&self) -> Option<&str> {
        self.commands.as_deref()
    }

    /// Raw semicolon-delimited output file patterns.
    pub fn output_file_patterns(&self) -> Option<&str> {
        self.output_file_patterns.as_deref()
    }

    /// Whether superseded packages are pruned from the output directory.
    pub fn output_auto_remove(&self) -> bool {
        self.output_auto_remove
    }

    /// Whether include entries with missing sources are skipped.
    pub fn exclude_missing_files(&self) -> bool {
        self.exclude_missing_files
    }

    /// Whether a failing command stops the sequence.
    pub fn strict_commands(&self) -> bool {
        self.strict_commands
    }
}

fn text(config: &dyn PropertySource, key: &str) -> Option<String> {
    config
        .property(key)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

fn flag(config: &dyn PropertySource, key: &str) -> bool {
    let Some(value) = config.property(key) else {
        return false;
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => true,
        "false" | "no" | "off" | "0" | "" => false,
        other => {
            log::warn!("Property '{key}' has non-boolean value `{other}`; treating as false");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_nothing_is_defined() {
        let settings = DistributionSettings::from_config(&config(&[]));
        assert_eq!(settings, DistributionSettings::default());
        assert!(settings.output_location().is_none());
        assert!(!settings.output_auto_remove());
    }

    #[test]
    fn reads_every_property() {
        let settings = DistributionSettings::from_config(&config(&[
            (properties::OUTPUT_LOCATION, "dist"),
            (properties::COMMANDS, "nuget pack a.nuspec|nuget sign a.nupkg"),
            (properties::OUTPUT_FILE_PATTERNS, "*.nupkg;*.snupkg"),
            (properties::OUTPUT_AUTO_REMOVE, "True"),
            (properties::EXCLUDE_MISSING_FILES, "yes"),
            (properties::STRICT_COMMANDS, "1"),
        ]));

        assert_eq!(settings.output_location(), Some(Path::new("dist")));
        assert_eq!(settings.commands(), Some("nuget pack a.nuspec|nuget sign a.nupkg"));
        assert_eq!(settings.output_file_patterns(), Some("*.nupkg;*.snupkg"));
        assert!(settings.output_auto_remove());
        assert!(settings.exclude_missing_files());
        assert!(settings.strict_commands());
    }

    #[test]
    fn blank_values_are_undefined_and_junk_flags_false() {
        let settings = DistributionSettings::from_config(&config(&[
            (properties::OUTPUT_LOCATION, "   "),
            (properties::OUTPUT_AUTO_REMOVE, "sometimes"),
        ]));

        assert!(settings.output_location().is_none());
        assert!(!settings.output_auto_remove());
    }

    #[test]
    fn cli_strict_flag_only_turns_strict_on() {
        let lenient = DistributionSettings::default().with_strict_commands(false);
        assert!(!lenient.strict_commands());

        let from_props = DistributionSettings::from_config(&config(&[(
            properties::STRICT_COMMANDS,
            "on",
        )]))
        .with_strict_commands(false);
        assert!(from_props.strict_commands());

        assert!(DistributionSettings::default().with_strict_commands(true).strict_commands());
    }
}
