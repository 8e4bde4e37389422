use std::fmt;

use schemabind_format::FormatIdentifier;

/// Pointer to a schema resource held by a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaReference {
    subject: String,
    version: u32,
    format: FormatIdentifier,
}

impl SchemaReference {
    pub fn new(subject: impl Into<String>, version: u32, format: impl Into<FormatIdentifier>) -> Self {
        Self {
            subject: subject.into(),
            version,
            format: format.into(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Format of the referenced definition.
    pub fn format(&self) -> &FormatIdentifier {
        &self.format
    }
}

impl fmt::Display for SchemaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/v{} ({})", self.subject, self.version, self.format)
    }
}
