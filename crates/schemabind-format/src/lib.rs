//! Pluggable schema formats.
//!
//! Each format turns definition text into a [`StructuredSchema`], validates
//! canonical JSON trees against it, and decides whether two definitions
//! denote the same schema. Two formats ship with the crate:
//!
//! - [`json`]: JSON Schema, compiled for draft 2020-12
//! - [`proto`]: Protocol Buffers, parsed into a descriptor tree
//!
//! Additional formats implement [`SchemaFormat`] and are registered in a
//! [`SchemaFormats`] set under their own [`FormatIdentifier`].

pub mod error;
pub mod format;
pub mod formats;
pub mod identifier;
pub mod json;
pub mod proto;
pub mod schema;
pub mod violation;

pub use error::{FormatError, Result};
pub use format::SchemaFormat;
pub use formats::SchemaFormats;
pub use identifier::FormatIdentifier;
pub use json::{JsonFormat, JsonSchema};
pub use proto::{ProtoFile, ProtoFormat};
pub use schema::StructuredSchema;
pub use violation::{join_messages, ValidationViolation, Violations};
