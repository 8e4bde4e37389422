//! JSON Schema (draft 2020-12) format.

use std::fmt;

use jsonschema::{Draft, Validator};
use serde_json::{Map, Value};

use crate::error::{FormatError, Result};
use crate::format::{ensure_format, SchemaFormat};
use crate::identifier::FormatIdentifier;
use crate::schema::StructuredSchema;
use crate::violation::{ValidationViolation, Violations};

/// A compiled JSON Schema together with the document it was compiled from.
pub struct JsonSchema {
    validator: Validator,
    document: Value,
}

impl JsonSchema {
    /// Compile schema text.
    pub fn compile(text: &str) -> Result<Self> {
        Self::compile_with(text, false)
    }

    /// Compile schema text, optionally closing object schemas.
    pub fn compile_with(text: &str, strict_mode: bool) -> Result<Self> {
        let document: Value = serde_json::from_str(text)
            .map_err(|err| FormatError::parse(FormatIdentifier::JSON, err.to_string()))?;
        Self::from_value(document, strict_mode)
    }

    /// Compile an already parsed schema document.
    pub fn from_value(mut document: Value, strict_mode: bool) -> Result<Self> {
        if !matches!(document, Value::Object(_) | Value::Bool(_)) {
            return Err(FormatError::parse(
                FormatIdentifier::JSON,
                "schema must be a JSON object or boolean",
            ));
        }
        if strict_mode {
            close_objects(&mut document);
        }

        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&document)
            .map_err(|err| FormatError::parse(FormatIdentifier::JSON, err.to_string()))?;

        Ok(Self {
            validator,
            document,
        })
    }

    /// Every violated constraint for `instance`.
    pub fn validate(&self, instance: &Value) -> Violations {
        self.validator
            .iter_errors(instance)
            .map(|err| {
                ValidationViolation::at(
                    err.instance_path().as_str(),
                    err.schema_path().as_str(),
                    err.to_string(),
                )
            })
            .collect()
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// The compiled document, after strict-mode rewriting.
    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

impl From<JsonSchema> for StructuredSchema {
    fn from(schema: JsonSchema) -> Self {
        StructuredSchema::new(FormatIdentifier::JSON, schema)
    }
}

/// JSON Schema format.
///
/// Equivalence is literal text equality; no semantic comparison of schema
/// documents is attempted.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat {
    strict_mode: bool,
}

impl JsonFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// When enabled, object schemas reject properties they do not declare.
    pub fn with_strict_mode(strict_mode: bool) -> Self {
        Self { strict_mode }
    }

    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }
}

impl SchemaFormat for JsonFormat {
    fn id(&self) -> FormatIdentifier {
        FormatIdentifier::JSON
    }

    fn parse(&self, text: &str) -> Result<StructuredSchema> {
        JsonSchema::compile_with(text, self.strict_mode).map(StructuredSchema::from)
    }

    fn validate_instance(&self, schema: &StructuredSchema, instance: &Value) -> Result<Violations> {
        ensure_format(self.id(), schema)?;
        let compiled = schema
            .downcast_ref::<JsonSchema>()
            .ok_or_else(|| FormatError::FormatMismatch {
                expected: self.id(),
                found: schema.format().clone(),
            })?;
        Ok(compiled.validate(instance))
    }

    fn is_equivalent(&self, a: &str, b: &str) -> bool {
        a == b
    }
}

/// How a keyword holds its subschemas.
#[derive(Clone, Copy)]
enum Subschemas {
    /// An object of name to subschema (`properties`, `$defs`, ...).
    Named,
    /// A single subschema, or a legacy tuple of them under `items`.
    One,
    /// An array of subschemas (`allOf`, `prefixItems`, ...).
    List,
}

fn subschemas(keyword: &str) -> Option<Subschemas> {
    match keyword {
        "properties" | "patternProperties" | "dependentSchemas" | "$defs" | "definitions" => {
            Some(Subschemas::Named)
        }
        "propertyNames" | "additionalProperties" | "unevaluatedProperties" | "items"
        | "contains" | "additionalItems" | "unevaluatedItems" | "not" | "if" | "then"
        | "else" => Some(Subschemas::One),
        "prefixItems" | "allOf" | "anyOf" | "oneOf" => Some(Subschemas::List),
        _ => None,
    }
}

/// Close every object schema reachable from `schema` to undeclared
/// properties. An explicit `additionalProperties` is left as written.
fn close_objects(schema: &mut Value) {
    let Value::Object(map) = schema else {
        return;
    };
    if describes_object(map) {
        map.entry("additionalProperties")
            .or_insert(Value::Bool(false));
    }

    for (keyword, child) in map.iter_mut() {
        match (subschemas(keyword), child) {
            (Some(Subschemas::Named), Value::Object(named)) => {
                named.values_mut().for_each(close_objects)
            }
            (Some(Subschemas::List | Subschemas::One), Value::Array(list)) => {
                list.iter_mut().for_each(close_objects)
            }
            (Some(Subschemas::One), one) => close_objects(one),
            _ => {}
        }
    }
}

fn describes_object(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(kind)) => kind == "object",
        Some(Value::Array(kinds)) => kinds.iter().any(|kind| kind.as_str() == Some("object")),
        _ => map.keys().any(|keyword| {
            matches!(
                keyword.as_str(),
                "properties"
                    | "patternProperties"
                    | "additionalProperties"
                    | "unevaluatedProperties"
                    | "required"
                    | "dependentRequired"
                    | "dependentSchemas"
                    | "propertyNames"
            )
        }),
    }
}
