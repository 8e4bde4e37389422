use schemabind_format::{join_messages, FormatError, Violations};

use crate::identity::TypeIdentity;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the schema manager.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// No schema is bound for the type, or the registry has no such schema.
    #[error("schema not found for {type_id}: {detail}")]
    SchemaNotFound {
        type_id: TypeIdentity,
        detail: String,
    },

    /// Fetching or parsing failed for any reason other than not-found.
    #[error("failed to register schema for {type_id}: {source}")]
    RegistrationFailed {
        type_id: TypeIdentity,
        #[source]
        source: BoxError,
    },

    /// The payload is not well-formed JSON.
    #[error("payload is not valid JSON: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    /// The payload is well-formed but violates its schema.
    #[error("validation failed for {type_id}: {}", join_messages(.violations))]
    ValidationFailed {
        type_id: TypeIdentity,
        violations: Violations,
    },

    /// Converting between a typed value and its JSON tree failed.
    #[error("conversion failed for {type_id}: {source}")]
    Conversion {
        type_id: TypeIdentity,
        #[source]
        source: serde_json::Error,
    },

    /// Format lookup or format-level validation failed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A schema file could not be loaded from disk.
    #[error("failed to load schema: {0}")]
    LoadFailed(String),
}

impl SchemaError {
    pub(crate) fn not_bound(type_id: &TypeIdentity) -> Self {
        Self::SchemaNotFound {
            type_id: type_id.clone(),
            detail: "no schema registered".to_string(),
        }
    }

    pub(crate) fn registration(type_id: &TypeIdentity, source: impl Into<BoxError>) -> Self {
        Self::RegistrationFailed {
            type_id: type_id.clone(),
            source: source.into(),
        }
    }

    /// Violations carried by a validation failure.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Self::ValidationFailed { violations, .. } => Some(violations),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
