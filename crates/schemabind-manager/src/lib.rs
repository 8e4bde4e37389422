//! Type-keyed schema binding and validation.
//!
//! A [`SchemaManager`] binds application types to parsed schemas, either by
//! fetching definition text through a registry client or by taking an
//! already parsed schema. Payloads are validated against the bound schema
//! before they are converted into typed values; nothing that fails
//! validation is ever handed back as a typed value.

pub mod cache;
pub mod config;
pub mod error;
pub mod identity;
mod loader;
pub mod manager;

pub use cache::SchemaCache;
pub use config::ManagerConfig;
pub use error::{Result, SchemaError};
pub use identity::{SchemaBound, TypeIdentity};
pub use manager::SchemaManager;
