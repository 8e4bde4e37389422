//! Bind application types to externally managed schemas.
//!
//! schemabind parses JSON Schema and Protobuf definitions, caches one parsed
//! schema per application type, and validates inbound payloads before they
//! are converted into typed values.
//!
//! # Crate Structure
//!
//! - [`format`]: schema formats, parsing, validation and equivalence
//! - [`registry`]: registry client interface and bundled clients
//! - [`manager`]: type-keyed cache and the validate-then-convert pipeline

/// Re-export format types.
pub mod format {
    pub use schemabind_format::*;
}

/// Re-export registry client types.
pub mod registry {
    pub use schemabind_registry::*;
}

/// Re-export manager types.
pub mod manager {
    pub use schemabind_manager::*;
}
