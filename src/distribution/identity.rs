//! Package identity derived from artifact file names.
//!
//! The identity is the file name with its last three dot-separated segments
//! removed, which assumes names shaped like `{id}.{major}.{minor}.{patch}.nupkg`:
//!
//! | file name                  | identity    |
//! |----------------------------|-------------|
//! | `Foo.1.0.0.nupkg`          | `Foo.1`     |
//! | `Foo.Bar.1.2.3.nupkg`      | `Foo.Bar.1` |
//! | `Foo.1.2.3-beta.nupkg`     | `Foo.1`     |
//! | `Foo.1.2.3.4.nupkg`        | `Foo.1.2`   |
//!
//! Only the segment count matters, so four-part versions and prerelease
//! suffixes group by a longer or shorter prefix than one might expect.
//! Names with three or fewer segments share the empty identity.

use std::collections::BTreeMap;

const TRAILING_SEGMENTS: usize = 3;

/// Returns the version-independent identity of `file_name`.
pub fn package_identity(file_name: &str) -> String {
    let segments: Vec<&str> = file_name.split('.').collect();
    let keep = segments.len().saturating_sub(TRAILING_SEGMENTS);
    segments[..keep].join(".")
}

/// Groups items by the identity of their file name, ignoring ASCII case.
///
/// Keys are the lowercased identities; items keep their input order within a group.
pub fn group_by_identity<T, F>(
    items: impl IntoIterator<Item = T>,
    file_name: F,
) -> BTreeMap<String, Vec<T>>
where
    F: Fn(&T) -> &str,
{
    let mut groups: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for item in items {
        let key = package_identity(file_name(&item)).to_ascii_lowercase();
        groups.entry(key).or_default().push(item);
    }
    groups
}
