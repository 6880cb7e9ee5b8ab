//! `${property}` placeholder expansion.

use super::PropertySource;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^{}]+)\}").expect("placeholder pattern is valid"));

/// Default limit on nested expansion, guarding against self-referencing properties.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Substitutes `${name}` placeholders with property values.
///
/// Values are expanded in turn, so properties may reference other
/// properties. Undefined placeholders are left verbatim.
#[derive(Debug, Clone, Copy)]
pub struct Expander {
    max_depth: usize,
}

impl Expander {
    /// Creates an expander with the default nesting limit.
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets how many levels of nested placeholders are expanded.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Expands all placeholders in `template` against `config`.
    pub fn expand(&self, config: &dyn PropertySource, template: &str) -> String {
        self.expand_at(config, template, 0)
    }

    fn expand_at(&self, config: &dyn PropertySource, template: &str, depth: usize) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                let name = caps[1].trim();
                match config.property(name) {
                    Some(value) if depth < self.max_depth => {
                        self.expand_at(config, value, depth + 1)
                    }
                    Some(value) => {
                        log::warn!("Expansion of `${{{name}}}` stopped at depth {depth}");
                        value.to_string()
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

impl Default for Expander {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_defined_properties() {
        let config = props(&[("id", "Acme.Tools"), ("version", "1.2.3")]);
        let expanded = Expander::new().expand(&config, "${id}.${version}.nupkg");
        assert_eq!(expanded, "Acme.Tools.1.2.3.nupkg");
    }

    #[test]
    fn leaves_undefined_placeholders_verbatim() {
        let config = props(&[("id", "Acme")]);
        let expanded = Expander::new().expand(&config, "${id}/${missing}/x");
        assert_eq!(expanded, "Acme/${missing}/x");
    }

    #[test]
    fn expands_nested_references() {
        let config = props(&[
            ("bin", "${root}/bin"),
            ("root", "build/${configuration}"),
            ("configuration", "Release"),
        ]);
        let expanded = Expander::new().expand(&config, "${bin}/app.dll");
        assert_eq!(expanded, "build/Release/bin/app.dll");
    }

    #[test]
    fn self_reference_terminates() {
        let config = props(&[("loop", "x${loop}")]);
        let expanded = Expander::new().max_depth(3).expand(&config, "${loop}");
        assert_eq!(expanded, "xxxx${loop}");
    }

    #[test]
    fn property_names_are_case_sensitive() {
        let config = props(&[("Id", "Upper")]);
        assert_eq!(Expander::new().expand(&config, "${id}"), "${id}");
    }
}
