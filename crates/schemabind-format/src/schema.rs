use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::identifier::FormatIdentifier;

/// A parsed, immutable schema ready for repeated validation.
///
/// The format-specific body (a compiled JSON Schema, a Protobuf descriptor
/// tree, ...) sits behind an `Arc`, so clones are cheap and share the same
/// body. Bodies are never mutated after construction.
#[derive(Clone)]
pub struct StructuredSchema {
    format: FormatIdentifier,
    body: Arc<dyn Any + Send + Sync>,
}

impl StructuredSchema {
    /// Wrap a format-specific body.
    pub fn new<T>(format: FormatIdentifier, body: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            format,
            body: Arc::new(body),
        }
    }

    /// The format that produced this schema.
    pub fn format(&self) -> &FormatIdentifier {
        &self.format
    }

    /// Borrow the body as a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.body.downcast_ref::<T>()
    }

    /// True when both handles share the same parsed body.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for StructuredSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredSchema")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
