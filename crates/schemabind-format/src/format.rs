use serde_json::Value;

use crate::error::{FormatError, Result};
use crate::identifier::FormatIdentifier;
use crate::schema::StructuredSchema;
use crate::violation::Violations;

/// Parsing, validation and equivalence for one schema format.
///
/// Implementations are stateless apart from their own configuration and are
/// shared across threads behind an `Arc`.
pub trait SchemaFormat: Send + Sync {
    /// The identifier this format is registered under.
    fn id(&self) -> FormatIdentifier;

    /// Parse definition text into a structured schema.
    fn parse(&self, text: &str) -> Result<StructuredSchema>;

    /// Whether `text` is a syntactically valid definition.
    fn parse_is_valid(&self, text: &str) -> bool {
        self.parse(text).is_ok()
    }

    /// Validate a canonical tree against a schema produced by this format.
    ///
    /// Every violated constraint is reported; validation does not stop at
    /// the first failure.
    fn validate_instance(&self, schema: &StructuredSchema, instance: &Value) -> Result<Violations> {
        let _ = (schema, instance);
        Err(FormatError::ValidationUnsupported(self.id()))
    }

    /// Whether two definitions denote the same schema.
    fn is_equivalent(&self, a: &str, b: &str) -> bool;

    /// Index of the first candidate equivalent to `definition`.
    fn find_equivalent(&self, candidates: &[&str], definition: &str) -> Option<usize> {
        candidates
            .iter()
            .position(|candidate| self.is_equivalent(definition, candidate))
    }
}

/// Reject schemas produced by another format.
pub(crate) fn ensure_format(expected: FormatIdentifier, schema: &StructuredSchema) -> Result<()> {
    if schema.format() == &expected {
        Ok(())
    } else {
        Err(FormatError::FormatMismatch {
            expected,
            found: schema.format().clone(),
        })
    }
}
