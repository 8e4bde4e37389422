use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{FormatError, Result};
use crate::format::SchemaFormat;
use crate::identifier::FormatIdentifier;
use crate::json::JsonFormat;
use crate::proto::ProtoFormat;

/// Identifier-keyed set of schema formats.
#[derive(Clone, Default)]
pub struct SchemaFormats {
    formats: HashMap<FormatIdentifier, Arc<dyn SchemaFormat>>,
}

impl SchemaFormats {
    /// An empty set with no formats.
    pub fn empty() -> Self {
        Self::default()
    }

    /// JSON Schema and Protobuf with default settings.
    pub fn with_defaults() -> Self {
        Self::with_json(JsonFormat::new())
    }

    /// The built-in formats, using an explicitly configured JSON format.
    pub fn with_json(json: JsonFormat) -> Self {
        let mut formats = Self::empty();
        formats.register(Arc::new(json));
        formats.register(Arc::new(ProtoFormat::new()));
        formats
    }

    /// Add or replace a format under its own identifier.
    pub fn register(&mut self, format: Arc<dyn SchemaFormat>) {
        self.formats.insert(format.id(), format);
    }

    /// Look up a format.
    pub fn get(&self, id: &FormatIdentifier) -> Result<&Arc<dyn SchemaFormat>> {
        self.formats
            .get(id)
            .ok_or_else(|| FormatError::UnknownFormat(id.clone()))
    }

    pub fn contains(&self, id: &FormatIdentifier) -> bool {
        self.formats.contains_key(id)
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<FormatIdentifier> {
        let mut ids: Vec<FormatIdentifier> = self.formats.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for SchemaFormats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaFormats")
            .field("formats", &self.ids())
            .finish()
    }
}
