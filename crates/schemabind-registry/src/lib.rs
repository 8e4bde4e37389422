//! Schema registry client interface.
//!
//! The manager never talks to a registry service directly. It asks a
//! [`RegistryClient`] for the raw text behind a [`SchemaReference`] and
//! relies on [`FetchError::NotFound`] to tell "no such schema" apart from
//! every other failure. Retry and timeout policy belong to the client.
//!
//! Two local clients are provided:
//! - [`InMemoryRegistryClient`]: embedded defaults and test doubles
//! - [`DirectoryRegistryClient`]: a registry laid out on disk

pub mod client;
pub mod directory;
pub mod error;
pub mod memory;
pub mod reference;

pub use client::RegistryClient;
pub use directory::DirectoryRegistryClient;
pub use error::{FetchError, Result};
pub use memory::InMemoryRegistryClient;
pub use reference::SchemaReference;
