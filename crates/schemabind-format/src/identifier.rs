//! Format identifiers.
//!
//! Formats are selected by a short tag rather than a closed enum so new
//! formats can be plugged in without touching the manager or cache.

use std::borrow::Cow;
use std::fmt;

/// Short tag naming a schema format (`"json"`, `"proto"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormatIdentifier(Cow<'static, str>);

impl FormatIdentifier {
    /// JSON Schema (draft 2020-12).
    pub const JSON: FormatIdentifier = FormatIdentifier(Cow::Borrowed("json"));

    /// Protocol Buffers definitions.
    pub const PROTO: FormatIdentifier = FormatIdentifier(Cow::Borrowed("proto"));

    /// Create an identifier from a tag. Tags are compared case-insensitively.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into().trim().to_ascii_lowercase();
        match tag.as_str() {
            "json" => Self::JSON,
            "proto" => Self::PROTO,
            _ => Self(Cow::Owned(tag)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Guess the format from a file name (`*.json` → json, `*.proto` → proto).
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".json") {
            Some(Self::JSON)
        } else if lower.ends_with(".proto") {
            Some(Self::PROTO)
        } else {
            None
        }
    }
}

impl fmt::Display for FormatIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormatIdentifier {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for FormatIdentifier {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl std::str::FromStr for FormatIdentifier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
