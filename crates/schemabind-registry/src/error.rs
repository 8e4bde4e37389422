use crate::reference::SchemaReference;

/// Errors returned by registry clients.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The registry holds no schema for the reference.
    #[error("failed to fetch schema {reference}: not found")]
    NotFound { reference: SchemaReference },

    /// Transport or storage I/O failed.
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The registry answered but refused the request.
    #[error("registry rejected request: {0}")]
    Rejected(String),
}

impl FetchError {
    /// True for the not-found condition, as opposed to any other failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
