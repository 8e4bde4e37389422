use crate::error::Result;
use crate::reference::SchemaReference;

/// Fetches raw schema text by reference.
///
/// Implementations must return [`FetchError::NotFound`] when the registry
/// has no schema for the reference, so callers can distinguish it from
/// transport failures.
///
/// [`FetchError::NotFound`]: crate::FetchError::NotFound
pub trait RegistryClient: Send + Sync {
    fn fetch(&self, reference: &SchemaReference) -> Result<String>;
}

impl<T: RegistryClient + ?Sized> RegistryClient for std::sync::Arc<T> {
    fn fetch(&self, reference: &SchemaReference) -> Result<String> {
        (**self).fetch(reference)
    }
}

impl<T: RegistryClient + ?Sized> RegistryClient for Box<T> {
    fn fetch(&self, reference: &SchemaReference) -> Result<String> {
        (**self).fetch(reference)
    }
}
