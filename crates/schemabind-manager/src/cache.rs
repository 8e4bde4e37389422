use std::collections::HashMap;

use parking_lot::RwLock;
use schemabind_format::StructuredSchema;

use crate::identity::TypeIdentity;

/// Type-keyed binding table of parsed schemas.
///
/// One schema is bound per type; `put` replaces any previous binding.
/// Readers get a cloned handle to the bound schema, so a concurrent
/// overwrite is observed either entirely or not at all.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: RwLock<HashMap<TypeIdentity, StructuredSchema>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `schema` to `type_id`, returning the previously bound schema.
    pub fn put(&self, type_id: TypeIdentity, schema: StructuredSchema) -> Option<StructuredSchema> {
        self.entries.write().insert(type_id, schema)
    }

    pub fn get(&self, type_id: &TypeIdentity) -> Option<StructuredSchema> {
        self.entries.read().get(type_id).cloned()
    }

    pub fn contains(&self, type_id: &TypeIdentity) -> bool {
        self.entries.read().contains_key(type_id)
    }

    /// Bound types, sorted.
    pub fn types(&self) -> Vec<TypeIdentity> {
        let mut types: Vec<TypeIdentity> = self.entries.read().keys().cloned().collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
