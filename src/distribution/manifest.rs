//! Merging include lists into the package manifest.
//!
//! The manifest is the `.nuspec` file named by expanding
//! [`MANIFEST_TEMPLATE`] against the build properties. Each include entry
//! becomes a `<file src=".." target=".."/>` element appended to the root's
//! `<files>` element; everything else in the document passes through.
//!
//! Missing inputs are not errors: a manifest that does not exist or has no
//! root element leaves the merge as a no-op, reported through [`MergeOutcome`].

use crate::{
    config::{Expander, IncludeEntry, PackageContents, PropertySource, TextEncoding},
    distribution::{
        DistributionSettings,
        error::{Context, Error, ErrorExt, Result},
        utils::fs,
    },
};
use std::path::{Path, PathBuf};
use xmltree::{Element, EmitterConfig, XMLNode};

/// Manifest file name template, relative to the project location.
pub const MANIFEST_TEMPLATE: &str = "${id}.nuspec";

const FILES_ELEMENT: &str = "files";
const FILE_ELEMENT: &str = "file";
const SRC_ATTRIBUTE: &str = "src";
const TARGET_ATTRIBUTE: &str = "target";

/// Result of a merge attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The expanded manifest path does not exist.
    ManifestMissing(PathBuf),
    /// The manifest has no root element.
    NoRoot(PathBuf),
    /// The manifest was rewritten.
    Merged {
        /// Manifest path
        manifest: PathBuf,
        /// `file` elements appended
        added: usize,
        /// Entries skipped because their source does not exist
        skipped: usize,
    },
}

/// Merges include entries into the package manifest.
pub struct ManifestMerger<'a> {
    config: &'a dyn PropertySource,
    settings: &'a DistributionSettings,
    location: &'a Path,
    encoding: TextEncoding,
    expander: Expander,
}

impl<'a> ManifestMerger<'a> {
    /// Creates a merger for the project at `location`.
    pub fn new(
        config: &'a dyn PropertySource,
        settings: &'a DistributionSettings,
        location: &'a Path,
        encoding: TextEncoding,
    ) -> Self {
        Self {
            config,
            settings,
            location,
            encoding,
            expander: Expander::new(),
        }
    }

    /// Path of the manifest this merger edits.
    pub fn manifest_path(&self) -> PathBuf {
        self.location
            .join(self.expander.expand(self.config, MANIFEST_TEMPLATE))
    }

    /// Reads the include list at `include_list` and merges it.
    pub async fn merge(&self, include_list: &Path) -> Result<MergeOutcome> {
        let includes = PackageContents::load(include_list, self.encoding).await?;
        self.merge_contents(&includes).await
    }

    /// Merges already-loaded include entries.
    ///
    /// The manifest is written back exactly once, even when every entry was skipped.
    pub async fn merge_contents(&self, includes: &PackageContents) -> Result<MergeOutcome> {
        let manifest = self.manifest_path();

        let Some(bytes) = fs::read_optional(&manifest, "reading package manifest").await? else {
            log::debug!("No manifest at {}; skipping include merge", manifest.display());
            return Ok(MergeOutcome::ManifestMissing(manifest));
        };

        let text = self.encoding.decode(&bytes);
        let Some(mut root) = parse_manifest(&text, &manifest)? else {
            log::debug!("Manifest {} has no root element", manifest.display());
            return Ok(MergeOutcome::NoRoot(manifest));
        };

        let files = files_element(&mut root)?;
        let mut added = 0;
        let mut skipped = 0;
        for entry in includes {
            if self.settings.exclude_missing_files()
                && !fs::exists(&self.location.join(&entry.source)).await
            {
                log::debug!("Excluding missing include {}", entry.source);
                skipped += 1;
                continue;
            }

            let file = self.file_element(entry, files);
            files.children.push(XMLNode::Element(file));
            added += 1;
        }

        let header = prolog(strip_declaration(&text));
        let rendered = render_manifest(header, &root, self.encoding, &manifest)?;
        tokio::fs::write(&manifest, rendered)
            .await
            .fs_context("writing package manifest", &manifest)?;

        log::info!(
            "✓ Merged {} include(s) into {} ({} skipped)",
            added,
            manifest.display(),
            skipped
        );

        Ok(MergeOutcome::Merged {
            manifest,
            added,
            skipped,
        })
    }

    fn file_element(&self, entry: &IncludeEntry, parent: &Element) -> Element {
        let mut file = child_of(parent, FILE_ELEMENT);
        file.attributes.insert(
            SRC_ATTRIBUTE.to_string(),
            self.expander.expand(self.config, &entry.source),
        );
        file.attributes.insert(
            TARGET_ATTRIBUTE.to_string(),
            self.expander.expand(self.config, &entry.destination),
        );
        file
    }
}

/// New element in the same namespace as `parent`.
fn child_of(parent: &Element, name: &str) -> Element {
    let mut element = Element::new(name);
    element.namespace = parent.namespace.clone();
    element.prefix = parent.prefix.clone();
    element
}

/// Returns the root's `files` element, appending an empty one if absent.
fn files_element(root: &mut Element) -> Result<&mut Element> {
    if root.get_child(FILES_ELEMENT).is_none() {
        let files = child_of(root, FILES_ELEMENT);
        root.children.push(XMLNode::Element(files));
    }
    root.get_mut_child(FILES_ELEMENT)
        .context("manifest lost its `files` element after insertion")
}

/// Parses manifest text. An empty document yields `None`.
fn parse_manifest(text: &str, path: &Path) -> Result<Option<Element>> {
    let body = strip_declaration(text);
    if body.trim().is_empty() {
        return Ok(None);
    }

    Element::parse(body.as_bytes())
        .map(Some)
        .map_err(|e| Error::XmlParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Drops the XML declaration; the text is already decoded, so its
/// `encoding` attribute no longer describes the bytes the parser sees.
fn strip_declaration(text: &str) -> &str {
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    let Some(rest) = trimmed.strip_prefix("<?xml") else {
        return trimmed;
    };
    if !rest.starts_with(char::is_whitespace) {
        return trimmed;
    }
    match rest.find("?>") {
        Some(end) => &rest[end + 2..],
        None => trimmed,
    }
}

/// Comments, processing instructions and doctype ahead of the root element.
///
/// The parser skips these, so they are carried over as text.
fn prolog(body: &str) -> &str {
    let mut rest = body;
    loop {
        let trimmed = rest.trim_start();
        let close = if trimmed.starts_with("<!--") {
            "-->"
        } else if trimmed.starts_with("<?") {
            "?>"
        } else if trimmed.starts_with("<!") {
            match (trimmed.find('['), trimmed.find('>')) {
                (Some(open), Some(end)) if open < end => "]>",
                _ => ">",
            }
        } else {
            break;
        };
        match trimmed[2..].find(close) {
            Some(end) => rest = &trimmed[2 + end + close.len()..],
            None => break,
        }
    }
    body[..body.len() - rest.len()].trim()
}

fn render_manifest(
    prolog: &str,
    root: &Element,
    encoding: TextEncoding,
    path: &Path,
) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    root.write_with_config(
        &mut body,
        EmitterConfig::new()
            .perform_indent(true)
            .write_document_declaration(false),
    )
    .map_err(|e| Error::XmlWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let Ok(body) = String::from_utf8(body) else {
        crate::bail!("manifest serializer produced invalid UTF-8 for {}", path.display());
    };

    let mut document = format!(
        "<?xml version=\"1.0\" encoding=\"{}\"?>\n",
        encoding.output_name()
    );
    if !prolog.is_empty() {
        document.push_str(prolog);
        document.push('\n');
    }
    document.push_str(&body);
    document.push('\n');
    Ok(encoding.encode(&document))
}
