use std::path::Path;
use std::sync::Arc;

use schemabind_format::{
    FormatIdentifier, JsonFormat, SchemaFormats, StructuredSchema, Violations,
};
use schemabind_registry::{RegistryClient, SchemaReference};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cache::SchemaCache;
use crate::config::ManagerConfig;
use crate::error::{Result, SchemaError};
use crate::identity::{SchemaBound, TypeIdentity};
use crate::loader;

/// Binds application types to schemas and validates data against them.
///
/// All methods take `&self`; share a manager across threads with `Arc`.
/// Only [`register_by_reference`](Self::register_by_reference) performs I/O,
/// through the registry client.
pub struct SchemaManager {
    client: Arc<dyn RegistryClient>,
    formats: SchemaFormats,
    cache: SchemaCache,
    config: ManagerConfig,
}

impl SchemaManager {
    /// Manager with the built-in formats and default config.
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self::with_config(client, ManagerConfig::default())
    }

    /// Manager with the built-in formats configured from `config`.
    pub fn with_config(client: Arc<dyn RegistryClient>, config: ManagerConfig) -> Self {
        let formats = SchemaFormats::with_json(JsonFormat::with_strict_mode(config.strict_mode));
        Self::with_formats(client, formats, config)
    }

    /// Manager with an explicit format set.
    pub fn with_formats(
        client: Arc<dyn RegistryClient>,
        formats: SchemaFormats,
        config: ManagerConfig,
    ) -> Self {
        Self {
            client,
            formats,
            cache: SchemaCache::new(),
            config,
        }
    }

    /// Manager preloaded from embedded `(type, format, definition)` triples.
    pub fn from_embedded(
        client: Arc<dyn RegistryClient>,
        schemas: &[(&str, FormatIdentifier, &str)],
    ) -> Result<Self> {
        let manager = Self::new(client);
        for (type_id, format, text) in schemas {
            manager.register_text(*type_id, format, text)?;
        }
        Ok(manager)
    }

    /// Fetch, parse and bind the schema behind `reference`.
    ///
    /// A registry not-found answer surfaces as [`SchemaError::SchemaNotFound`];
    /// every other fetch or parse failure as
    /// [`SchemaError::RegistrationFailed`]. On failure the previous binding,
    /// if any, is left in place.
    pub fn register_by_reference(
        &self,
        type_id: impl Into<TypeIdentity>,
        reference: &SchemaReference,
    ) -> Result<()> {
        let type_id = type_id.into();

        let text = match self.client.fetch(reference) {
            Ok(text) => text,
            Err(err) if err.is_not_found() => {
                tracing::warn!(%type_id, %reference, "schema not found in registry");
                return Err(SchemaError::SchemaNotFound {
                    type_id,
                    detail: err.to_string(),
                });
            }
            Err(err) => {
                tracing::warn!(%type_id, %reference, error = %err, "schema fetch failed");
                return Err(SchemaError::registration(&type_id, err));
            }
        };

        if text.len() > self.config.max_schema_file_size {
            return Err(SchemaError::registration(
                &type_id,
                format!(
                    "schema text too large ({} bytes, max {})",
                    text.len(),
                    self.config.max_schema_file_size
                ),
            ));
        }

        let schema = self.parse(&type_id, reference.format(), &text)?;
        self.bind(type_id, schema);
        Ok(())
    }

    /// Bind an already parsed schema, bypassing fetch and parse.
    pub fn register_by_object(&self, type_id: impl Into<TypeIdentity>, schema: StructuredSchema) {
        self.bind(type_id.into(), schema);
    }

    /// Parse definition text and bind it.
    pub fn register_text(
        &self,
        type_id: impl Into<TypeIdentity>,
        format: &FormatIdentifier,
        text: &str,
    ) -> Result<()> {
        let type_id = type_id.into();
        let schema = self.parse(&type_id, format, text)?;
        self.bind(type_id, schema);
        Ok(())
    }

    /// Bind every schema file in a directory, keyed by file stem.
    ///
    /// `<type>.schema.json` files are JSON Schemas and `<type>.proto` files
    /// Protobuf definitions. Returns the number of schemas bound. Nothing is
    /// bound unless every file reads and parses.
    pub fn load_directory(&self, path: &Path) -> Result<usize> {
        let files = loader::read_schema_directory(path, &self.config)?;
        let parsed = files
            .into_iter()
            .map(|file| -> Result<(TypeIdentity, StructuredSchema)> {
                let schema = self.parse(&file.type_id, &file.format, &file.text)?;
                Ok((file.type_id, schema))
            })
            .collect::<Result<Vec<_>>>()?;

        let count = parsed.len();
        for (type_id, schema) in parsed {
            self.bind(type_id, schema);
        }
        tracing::debug!(path = %path.display(), count, "schema directory loaded");
        Ok(count)
    }

    /// The schema bound to `type_id`.
    pub fn get_schema(&self, type_id: &TypeIdentity) -> Result<StructuredSchema> {
        self.cache
            .get(type_id)
            .ok_or_else(|| SchemaError::not_bound(type_id))
    }

    /// Validate a typed value against the schema bound to its type.
    pub fn validate_object<T>(&self, instance: &T) -> Result<Violations>
    where
        T: SchemaBound + Serialize,
    {
        let type_id = TypeIdentity::of::<T>();
        let schema = self.get_schema(&type_id)?;
        let tree = serde_json::to_value(instance).map_err(|source| SchemaError::Conversion {
            type_id: type_id.clone(),
            source,
        })?;
        self.validate_tree(&schema, &tree)
    }

    /// Validate a JSON tree against the schema bound to `type_id`.
    pub fn validate_value(&self, type_id: &TypeIdentity, instance: &Value) -> Result<Violations> {
        let schema = self.get_schema(type_id)?;
        self.validate_tree(&schema, instance)
    }

    /// Parse, validate and convert a payload for a [`SchemaBound`] type.
    pub fn read_typed_data<T>(&self, payload: &[u8]) -> Result<T>
    where
        T: SchemaBound + DeserializeOwned,
    {
        self.read_data_as(&TypeIdentity::of::<T>(), payload)
    }

    /// Parse, validate and convert a payload bound to `type_id`.
    ///
    /// Conversion only happens after the payload passed validation.
    pub fn read_data_as<T>(&self, type_id: &TypeIdentity, payload: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let schema = self.get_schema(type_id)?;
        let tree: Value = serde_json::from_slice(payload).map_err(SchemaError::MalformedPayload)?;

        let violations = self.validate_tree(&schema, &tree)?;
        if !violations.is_empty() {
            tracing::debug!(%type_id, count = violations.len(), "payload rejected by schema");
            return Err(SchemaError::ValidationFailed {
                type_id: type_id.clone(),
                violations,
            });
        }

        serde_json::from_value(tree).map_err(|source| SchemaError::Conversion {
            type_id: type_id.clone(),
            source,
        })
    }

    pub fn has_schema(&self, type_id: &TypeIdentity) -> bool {
        self.cache.contains(type_id)
    }

    /// Types with a bound schema, sorted.
    pub fn registered_types(&self) -> Vec<TypeIdentity> {
        self.cache.types()
    }

    pub fn formats(&self) -> &SchemaFormats {
        &self.formats
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    fn parse(
        &self,
        type_id: &TypeIdentity,
        format: &FormatIdentifier,
        text: &str,
    ) -> Result<StructuredSchema> {
        let format = self
            .formats
            .get(format)
            .map_err(|err| SchemaError::registration(type_id, err))?;
        format.parse(text).map_err(|err| {
            tracing::warn!(%type_id, error = %err, "schema definition rejected");
            SchemaError::registration(type_id, err)
        })
    }

    fn bind(&self, type_id: TypeIdentity, schema: StructuredSchema) {
        let format = schema.format().clone();
        let replaced = self.cache.put(type_id.clone(), schema).is_some();
        tracing::debug!(%type_id, %format, replaced, "schema bound");
    }

    fn validate_tree(&self, schema: &StructuredSchema, tree: &Value) -> Result<Violations> {
        let format = self.formats.get(schema.format())?;
        Ok(format.validate_instance(schema, tree)?)
    }
}

impl std::fmt::Debug for SchemaManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaManager")
            .field("formats", &self.formats)
            .field("types", &self.cache.types())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use schemabind_format::{FormatError, JsonSchema, ProtoFile};
    use schemabind_registry::InMemoryRegistryClient;
    use serde::Deserialize;

    use super::*;
    use crate::loader::tests::{make_temp_schema_dir, write_schema};

    const USER_SCHEMA: &str = r#"{
        "type": "object",
        "properties": {
            "id": { "type": "integer", "minimum": 1 },
            "name": { "type": "string", "maxLength": 8 }
        },
        "required": ["id", "name"]
    }"#;

    const PERSON_PROTO: &str = r#"
        syntax = "proto3";
        package demo;
        message Person {
            string name = 1;
            int32 id = 2;
        }
    "#;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        id: i64,
        name: String,
    }

    impl SchemaBound for User {
        const TYPE_ID: &'static str = "demo.User";
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Unbound {
        value: u8,
    }

    impl SchemaBound for Unbound {
        const TYPE_ID: &'static str = "demo.Unbound";
    }

    fn user_reference() -> SchemaReference {
        SchemaReference::new("user", 1, FormatIdentifier::JSON)
    }

    fn manager_with_user() -> SchemaManager {
        let client = InMemoryRegistryClient::new().with_schema(user_reference(), USER_SCHEMA);
        let manager = SchemaManager::new(Arc::new(client));
        manager
            .register_by_reference(User::TYPE_ID, &user_reference())
            .unwrap();
        manager
    }

    fn user_id() -> TypeIdentity {
        TypeIdentity::of::<User>()
    }

    #[test]
    fn register_by_reference_binds_parsed_schema() {
        let manager = manager_with_user();

        assert!(manager.has_schema(&user_id()));
        let schema = manager.get_schema(&user_id()).unwrap();
        assert_eq!(schema.format(), &FormatIdentifier::JSON);
        assert!(schema.downcast_ref::<JsonSchema>().is_some());
        assert_eq!(manager.registered_types(), vec![user_id()]);
    }

    #[test]
    fn read_typed_data_returns_valid_instance() {
        let manager = manager_with_user();

        let user: User = manager
            .read_typed_data(br#"{"id":1,"name":"a"}"#)
            .unwrap();
        assert_eq!(
            user,
            User {
                id: 1,
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn read_typed_data_rejects_type_mismatch() {
        let manager = manager_with_user();

        let err = manager
            .read_typed_data::<User>(br#"{"id":"1","name":"a"}"#)
            .unwrap_err();
        let violations = err.violations().expect("validation failure");
        assert_eq!(violations.len(), 1);
        let message = violations.iter().next().unwrap().message();
        assert!(message.contains("integer"), "{message}");
        assert!(err.to_string().starts_with("validation failed for demo.User"));
    }

    #[test]
    fn read_typed_data_reports_every_violation() {
        let manager = manager_with_user();

        let err = manager
            .read_typed_data::<User>(br#"{"id":0,"name":"much too long"}"#)
            .unwrap_err();
        assert_eq!(err.violations().map(|v| v.len()), Some(2));
    }

    #[test]
    fn malformed_payload_is_distinct_from_violation() {
        let manager = manager_with_user();

        assert!(matches!(
            manager.read_typed_data::<User>(b"{not json"),
            Err(SchemaError::MalformedPayload(_))
        ));
    }

    #[test]
    fn unbound_type_fails_before_payload_is_inspected() {
        let manager = manager_with_user();

        assert!(matches!(
            manager.read_typed_data::<Unbound>(b"{not json"),
            Err(SchemaError::SchemaNotFound { .. })
        ));
        assert!(matches!(
            manager.validate_object(&Unbound { value: 1 }),
            Err(SchemaError::SchemaNotFound { .. })
        ));
        assert!(matches!(
            manager.get_schema(&TypeIdentity::of::<Unbound>()),
            Err(SchemaError::SchemaNotFound { .. })
        ));
    }

    #[test]
    fn conversion_failure_after_successful_validation() {
        let manager = manager_with_user();
        manager
            .register_text(User::TYPE_ID, &FormatIdentifier::JSON, r#"{"type":"object"}"#)
            .unwrap();

        assert!(matches!(
            manager.read_typed_data::<User>(br#"{"unrelated":true}"#),
            Err(SchemaError::Conversion { .. })
        ));
    }

    #[test]
    fn validate_object_reports_violations_without_error() {
        let manager = manager_with_user();

        let valid = User {
            id: 7,
            name: "ok".to_string(),
        };
        assert!(manager.validate_object(&valid).unwrap().is_empty());

        let invalid = User {
            id: 0,
            name: "ok".to_string(),
        };
        assert_eq!(manager.validate_object(&invalid).unwrap().len(), 1);
    }

    #[test]
    fn validate_value_uses_bound_schema() {
        let manager = manager_with_user();

        let violations = manager
            .validate_value(&user_id(), &serde_json::json!({"id": 1}))
            .unwrap();
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn registry_not_found_surfaces_as_schema_not_found() {
        let manager = SchemaManager::new(Arc::new(InMemoryRegistryClient::new()));

        let result = manager.register_by_reference(User::TYPE_ID, &user_reference());
        assert!(matches!(result, Err(SchemaError::SchemaNotFound { .. })));
        assert!(!manager.has_schema(&user_id()));
    }

    #[test]
    fn unavailable_registry_surfaces_as_registration_failure() {
        let client = Arc::new(InMemoryRegistryClient::new().with_schema(user_reference(), USER_SCHEMA));
        client.set_unavailable(true);
        let manager = SchemaManager::new(client.clone());

        let result = manager.register_by_reference(User::TYPE_ID, &user_reference());
        assert!(matches!(result, Err(SchemaError::RegistrationFailed { .. })));
        assert_eq!(client.fetch_count(), 1);
    }

    #[test]
    fn failed_registration_keeps_previous_binding() {
        let broken = SchemaReference::new("user", 2, FormatIdentifier::JSON);
        let client = Arc::new(
            InMemoryRegistryClient::new()
                .with_schema(user_reference(), USER_SCHEMA)
                .with_schema(broken.clone(), "{not a schema"),
        );
        let manager = SchemaManager::new(client);
        manager
            .register_by_reference(User::TYPE_ID, &user_reference())
            .unwrap();
        let before = manager.get_schema(&user_id()).unwrap();

        assert!(matches!(
            manager.register_by_reference(User::TYPE_ID, &broken),
            Err(SchemaError::RegistrationFailed { .. })
        ));
        assert!(manager.get_schema(&user_id()).unwrap().ptr_eq(&before));
    }

    #[test]
    fn oversized_definition_is_rejected() {
        let client = InMemoryRegistryClient::new().with_schema(user_reference(), USER_SCHEMA);
        let config = ManagerConfig {
            max_schema_file_size: 16,
            ..ManagerConfig::default()
        };
        let manager = SchemaManager::with_config(Arc::new(client), config);

        assert!(matches!(
            manager.register_by_reference(User::TYPE_ID, &user_reference()),
            Err(SchemaError::RegistrationFailed { .. })
        ));
    }

    #[test]
    fn unknown_format_fails_registration() {
        let manager = SchemaManager::new(Arc::new(InMemoryRegistryClient::new()));

        assert!(matches!(
            manager.register_text("demo.Avro", &FormatIdentifier::new("avro"), "{}"),
            Err(SchemaError::RegistrationFailed { .. })
        ));
    }

    #[test]
    fn rebinding_replaces_schema() {
        let manager = manager_with_user();
        let first = manager.get_schema(&user_id()).unwrap();

        let replacement = JsonSchema::compile(r#"{"type":"object"}"#).unwrap();
        manager.register_by_object(User::TYPE_ID, replacement.into());

        let second = manager.get_schema(&user_id()).unwrap();
        assert!(!second.ptr_eq(&first));
        let user: User = manager
            .read_typed_data(br#"{"id":0,"name":"no limits now"}"#)
            .unwrap();
        assert_eq!(user.id, 0);
    }

    #[test]
    fn proto_schema_registers_but_does_not_validate_instances() {
        let reference = SchemaReference::new("person", 3, FormatIdentifier::PROTO);
        let client = InMemoryRegistryClient::new().with_schema(reference.clone(), PERSON_PROTO);
        let manager = SchemaManager::new(Arc::new(client));
        manager
            .register_by_reference("demo.Person", &reference)
            .unwrap();

        let schema = manager.get_schema(&"demo.Person".into()).unwrap();
        let file = schema.downcast_ref::<ProtoFile>().unwrap();
        assert!(file.message("Person").is_some());

        assert!(matches!(
            manager.validate_value(&"demo.Person".into(), &serde_json::json!({})),
            Err(SchemaError::Format(FormatError::ValidationUnsupported(_)))
        ));
    }

    #[test]
    fn strict_mode_rejects_undeclared_properties() {
        let client = InMemoryRegistryClient::new().with_schema(user_reference(), USER_SCHEMA);
        let config = ManagerConfig {
            strict_mode: true,
            ..ManagerConfig::default()
        };
        let manager = SchemaManager::with_config(Arc::new(client), config);
        manager
            .register_by_reference(User::TYPE_ID, &user_reference())
            .unwrap();

        assert!(matches!(
            manager.read_typed_data::<User>(br#"{"id":1,"name":"a","extra":true}"#),
            Err(SchemaError::ValidationFailed { .. })
        ));
        assert!(manager.config().strict_mode);
    }

    #[test]
    fn from_embedded_binds_every_schema() {
        let manager = SchemaManager::from_embedded(
            Arc::new(InMemoryRegistryClient::new()),
            &[
                (User::TYPE_ID, FormatIdentifier::JSON, USER_SCHEMA),
                ("demo.Person", FormatIdentifier::PROTO, PERSON_PROTO),
            ],
        )
        .unwrap();

        assert_eq!(
            manager.registered_types(),
            vec![TypeIdentity::new("demo.Person"), user_id()]
        );
    }

    #[test]
    fn load_directory_binds_by_file_stem() {
        let dir = make_temp_schema_dir("manager-load");
        write_schema(&dir, "demo.User.schema.json", USER_SCHEMA);
        write_schema(&dir, "demo.Person.proto", PERSON_PROTO);

        let manager = SchemaManager::new(Arc::new(InMemoryRegistryClient::new()));
        assert_eq!(manager.load_directory(&dir).unwrap(), 2);
        assert!(manager
            .read_typed_data::<User>(br#"{"id":1,"name":"a"}"#)
            .is_ok());
        assert!(manager.has_schema(&"demo.Person".into()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_directory_load_binds_nothing() {
        let dir = make_temp_schema_dir("manager-load-partial");
        write_schema(&dir, "a.Good.schema.json", USER_SCHEMA);
        write_schema(&dir, "z.Bad.schema.json", "{not json");

        let manager = manager_with_user();
        let before = manager.registered_types();

        assert!(matches!(
            manager.load_directory(&dir),
            Err(SchemaError::RegistrationFailed { .. })
        ));
        assert_eq!(manager.registered_types(), before);
        assert!(!manager.has_schema(&"a.Good".into()));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn concurrent_reads_and_rebinds() {
        let manager = Arc::new(manager_with_user());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let user: User = manager
                            .read_typed_data(br#"{"id":3,"name":"c"}"#)
                            .unwrap();
                        assert_eq!(user.id, 3);
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            manager
                .register_text(User::TYPE_ID, &FormatIdentifier::JSON, USER_SCHEMA)
                .unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(manager.registered_types().len(), 1);
    }
}
