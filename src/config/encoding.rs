//! Text encoding used for build files.

use crate::distribution::{Error, Result};
use encoding_rs::Encoding;
use std::{fmt, str::FromStr};

/// Text encoding applied when reading and writing build files.
///
/// Wraps an [`encoding_rs`] encoding resolved from a WHATWG label
/// (`utf-8`, `windows-1252`, `utf-16le`, ...). Decoding honours a byte
/// order mark over the configured encoding.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    /// UTF-8.
    pub fn utf_8() -> Self {
        Self(encoding_rs::UTF_8)
    }

    /// Resolves an encoding label.
    pub fn for_label(label: &str) -> Result<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(Self)
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
    }

    /// Canonical name of the encoding.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Name of the encoding actually produced by [`TextEncoding::encode`].
    ///
    /// UTF-16 variants and `replacement` cannot be written and fall back to UTF-8.
    pub fn output_name(&self) -> &'static str {
        self.0.output_encoding().name()
    }

    /// Decodes bytes, stripping any byte order mark.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, used, had_errors) = self.0.decode(bytes);
        if had_errors {
            log::warn!(
                "Malformed {} input replaced with U+FFFD while decoding",
                used.name()
            );
        }
        text.into_owned()
    }

    /// Encodes text, replacing unmappable characters with numeric character references.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let (bytes, _, _) = self.0.encode(text);
        bytes.into_owned()
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf_8()
    }
}

impl fmt::Debug for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextEncoding").field(&self.name()).finish()
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::for_label(s)
    }
}
