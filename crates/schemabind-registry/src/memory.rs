use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::client::RegistryClient;
use crate::error::{FetchError, Result};
use crate::reference::SchemaReference;

/// Registry client backed by an in-process map.
#[derive(Debug, Default)]
pub struct InMemoryRegistryClient {
    schemas: RwLock<HashMap<SchemaReference, String>>,
    unavailable: AtomicBool,
    fetches: AtomicUsize,
}

impl InMemoryRegistryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_schema(self, reference: SchemaReference, text: impl Into<String>) -> Self {
        self.insert(reference, text);
        self
    }

    /// Store (or replace) the text behind a reference.
    pub fn insert(&self, reference: SchemaReference, text: impl Into<String>) {
        self.schemas.write().insert(reference, text.into());
    }

    /// Simulate a registry that cannot be reached.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of fetch calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl RegistryClient for InMemoryRegistryClient {
    fn fetch(&self, reference: &SchemaReference) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(FetchError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "registry unavailable",
            )));
        }

        self.schemas
            .read()
            .get(reference)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                reference: reference.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use schemabind_format::FormatIdentifier;

    use super::*;

    #[test]
    fn fetch_returns_stored_text() {
        let reference = SchemaReference::new("user", 1, FormatIdentifier::JSON);
        let client = InMemoryRegistryClient::new().with_schema(reference.clone(), "{}");

        assert_eq!(client.fetch(&reference).unwrap(), "{}");
        assert_eq!(client.fetch_count(), 1);
    }

    #[test]
    fn unknown_reference_is_not_found() {
        let client = InMemoryRegistryClient::new();
        let err = client
            .fetch(&SchemaReference::new("user", 2, "json"))
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("user/v2"));
    }

    #[test]
    fn unavailable_registry_is_io_error() {
        let reference = SchemaReference::new("user", 1, "json");
        let client = InMemoryRegistryClient::new().with_schema(reference.clone(), "{}");
        client.set_unavailable(true);

        let err = client.fetch(&reference).unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn versions_are_distinct() {
        let client = InMemoryRegistryClient::new()
            .with_schema(SchemaReference::new("user", 1, "json"), "v1")
            .with_schema(SchemaReference::new("user", 2, "json"), "v2");

        assert_eq!(
            client.fetch(&SchemaReference::new("user", 2, "json")).unwrap(),
            "v2"
        );
        assert!(client
            .fetch(&SchemaReference::new("user", 1, "proto"))
            .unwrap_err()
            .is_not_found());
    }
}
