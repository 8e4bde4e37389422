use crate::identifier::FormatIdentifier;

/// Errors raised by schema formats.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The schema definition text is malformed for its format.
    #[error("invalid {format} schema: {message}")]
    Parse {
        format: FormatIdentifier,
        message: String,
    },

    /// The format does not define instance-level validation.
    #[error("{0} schemas do not support instance validation")]
    ValidationUnsupported(FormatIdentifier),

    /// A schema was handed to a validator of another format.
    #[error("schema format mismatch (expected {expected}, found {found})")]
    FormatMismatch {
        expected: FormatIdentifier,
        found: FormatIdentifier,
    },

    /// No format is registered under the identifier.
    #[error("unknown schema format: {0}")]
    UnknownFormat(FormatIdentifier),
}

impl FormatError {
    pub(crate) fn parse(format: FormatIdentifier, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormatError>;
