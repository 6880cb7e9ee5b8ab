//! Build configuration collaborators.
//!
//! - [`PropertySource`] - read-only key/value lookup the pipeline depends on
//! - [`BuildConfig`] - properties loaded from `build.properties` files
//! - [`Expander`] - `${property}` substitution
//! - [`PackageContents`] - include lists for the package manifest
//! - [`TextEncoding`] - encoding used to read and write these files

mod encoding;
mod expander;
mod includes;
mod properties;

pub use encoding::TextEncoding;
pub use expander::{DEFAULT_MAX_DEPTH, Expander};
pub use includes::{IncludeEntry, PackageContents};
pub use properties::{
    BUILD_PROPERTIES_FILE, BuildConfig, PROJECT_LOCATION_PROPERTY, PROJECT_NAME_PROPERTY,
};

use std::{collections::HashMap, hash::BuildHasher};

/// Read-only access to named string properties.
///
/// Lookups are case-sensitive. An undefined key returns `None`.
pub trait PropertySource: Send + Sync {
    /// Returns the value of `key`, if defined.
    fn property(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher + Send + Sync> PropertySource for HashMap<String, String, S> {
    fn property(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}
