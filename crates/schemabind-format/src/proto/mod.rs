//! Protocol Buffers format.
//!
//! Definitions are parsed into a [`ProtoFile`] descriptor tree. There is no
//! instance validation for this format; equivalence is structural over the
//! package and the top-level messages.

mod descriptor;
mod lexer;
mod parser;

pub use descriptor::{
    Constant, Enum, EnumValue, Extend, Field, FieldType, Import, ImportKind, Label, Message,
    Method, NumberRange, Oneof, OptionEntry, ProtoFile, Reserved, Service, Syntax,
    MAX_FIELD_NUMBER, RESERVED_FIELD_NUMBERS,
};
pub use parser::parse_proto;

use crate::error::{FormatError, Result};
use crate::format::SchemaFormat;
use crate::identifier::FormatIdentifier;
use crate::schema::StructuredSchema;

/// Syntax error in `.proto` text, with 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

impl From<ParseError> for FormatError {
    fn from(err: ParseError) -> Self {
        FormatError::parse(FormatIdentifier::PROTO, err.to_string())
    }
}

impl From<ProtoFile> for StructuredSchema {
    fn from(file: ProtoFile) -> Self {
        StructuredSchema::new(FormatIdentifier::PROTO, file)
    }
}

/// Whether two parsed files describe the same schema.
///
/// Both must share the package (or both have none) and declare the same,
/// non-zero number of top-level messages. Every message of `other` must
/// have an identical counterpart of the same name in `source`; message
/// order is irrelevant.
pub fn is_same_proto(source: &ProtoFile, other: &ProtoFile) -> bool {
    if source.package != other.package {
        return false;
    }
    if source.messages.is_empty() || source.messages.len() != other.messages.len() {
        return false;
    }
    other.messages.iter().all(|message| {
        source
            .message(&message.name)
            .is_some_and(|counterpart| counterpart == message)
    })
}

/// Protobuf format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtoFormat;

impl ProtoFormat {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaFormat for ProtoFormat {
    fn id(&self) -> FormatIdentifier {
        FormatIdentifier::PROTO
    }

    fn parse(&self, text: &str) -> Result<StructuredSchema> {
        Ok(parse_proto(text)?.into())
    }

    fn is_equivalent(&self, a: &str, b: &str) -> bool {
        match (parse_proto(a), parse_proto(b)) {
            (Ok(a), Ok(b)) => is_same_proto(&a, &b),
            _ => false,
        }
    }

    fn find_equivalent(&self, candidates: &[&str], definition: &str) -> Option<usize> {
        let source = parse_proto(definition).ok()?;
        candidates
            .iter()
            .enumerate()
            .find_map(|(index, candidate)| match parse_proto(candidate) {
                Ok(target) if is_same_proto(&source, &target) => Some(index),
                Ok(_) => None,
                Err(err) => {
                    tracing::warn!(index, error = %err, "skipping unparsable proto candidate");
                    None
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON: &str = r#"
        syntax = "proto3";
        package org.example.person;

        message Person {
          optional string name = 1;
          optional int32 id = 2;
          optional string email = 3;
        }

        message Address {
          string street = 1;
          string city = 2;
        }
    "#;

    const PERSON_REORDERED: &str = r#"
        syntax = "proto3";
        // Same structure, different order and formatting.
        package org.example.person;
        message Address { string street = 1; string city = 2; }
        message Person {
          optional string name = 1;
          optional int32 id = 2;
          optional string email = 3;
        }
    "#;

    #[test]
    fn message_order_is_irrelevant() {
        let format = ProtoFormat::new();
        assert!(format.is_equivalent(PERSON, PERSON_REORDERED));
        assert!(format.is_equivalent(PERSON_REORDERED, PERSON));
    }

    #[test]
    fn extra_message_breaks_equivalence() {
        let extended = format!("{PERSON_REORDERED}\nmessage Phone {{ string number = 1; }}");
        let format = ProtoFormat::new();
        assert!(!format.is_equivalent(PERSON, &extended));
        assert!(!format.is_equivalent(&extended, PERSON));
    }

    #[test]
    fn field_changes_break_equivalence() {
        let format = ProtoFormat::new();
        let renumbered = PERSON.replace("email = 3", "email = 4");
        let retyped = PERSON.replace("int32 id", "int64 id");
        let renamed = PERSON.replace("string email", "string mail");

        assert!(!format.is_equivalent(PERSON, &renumbered));
        assert!(!format.is_equivalent(PERSON, &retyped));
        assert!(!format.is_equivalent(PERSON, &renamed));
    }

    #[test]
    fn package_must_match() {
        let format = ProtoFormat::new();
        let other_package = PERSON.replace("org.example.person", "org.example.other");
        let no_package = PERSON.replace("package org.example.person;", "");

        assert!(!format.is_equivalent(PERSON, &other_package));
        assert!(!format.is_equivalent(PERSON, &no_package));
        assert!(!format.is_equivalent(&no_package, PERSON));
        assert!(format.is_equivalent(&no_package, &no_package));
    }

    #[test]
    fn schemas_without_messages_never_match() {
        let format = ProtoFormat::new();
        let empty = "syntax = \"proto3\"; package a.b;";
        let only_enum = "syntax = \"proto3\"; enum Color { RED = 0; }";

        assert!(!format.is_equivalent(empty, empty));
        assert!(!format.is_equivalent(only_enum, only_enum));
    }

    #[test]
    fn malformed_definitions_are_not_equivalent() {
        let format = ProtoFormat::new();
        assert!(!format.is_equivalent(PERSON, "message {"));
        assert!(!format.parse_is_valid("message {"));
        assert!(format.parse_is_valid(PERSON));
    }

    #[test]
    fn find_equivalent_skips_unparsable_candidates() {
        let format = ProtoFormat::new();
        let other = PERSON.replace("org.example.person", "org.example.other");
        let candidates = [other.as_str(), "not a proto", PERSON_REORDERED];

        assert_eq!(format.find_equivalent(&candidates, PERSON), Some(2));
        assert_eq!(format.find_equivalent(&candidates[..2], PERSON), None);
        assert_eq!(format.find_equivalent(&candidates, "garbage {"), None);
    }

    #[test]
    fn parse_produces_descriptor_tree() {
        let schema = ProtoFormat::new().parse(PERSON).unwrap();
        assert_eq!(schema.format(), &FormatIdentifier::PROTO);

        let file = schema.downcast_ref::<ProtoFile>().unwrap();
        assert_eq!(file.package.as_deref(), Some("org.example.person"));
        assert_eq!(file.messages.len(), 2);
        let person = file.message("Person").unwrap();
        assert_eq!(person.field("id").unwrap().number, 2);
    }

    #[test]
    fn parse_error_converts_to_format_error() {
        let err = ProtoFormat::new().parse("message Broken {").unwrap_err();
        match err {
            FormatError::Parse { format, message } => {
                assert_eq!(format, FormatIdentifier::PROTO);
                assert!(message.contains("line 1"), "unexpected message: {message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn instance_validation_is_unsupported() {
        let format = ProtoFormat::new();
        let schema = format.parse(PERSON).unwrap();
        assert!(matches!(
            format.validate_instance(&schema, &serde_json::json!({"name": "a"})),
            Err(FormatError::ValidationUnsupported(_))
        ));
    }
}
