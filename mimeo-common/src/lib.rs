//! Shared types for the mimeo replicator.
//!
//! This crate holds everything the CLI and its tests agree on: the typed
//! catalog document tree, the cleaning transformation applied before an
//! object is re-published, the registry of replicable object types, and
//! the per-run report of successes and failures.

pub mod clean;
pub mod document;
pub mod report;
pub mod types;

pub use clean::clean_object;
pub use document::{CatalogObject, HookItem, HookList, HookStep, Hooks, Metadata, ObjectSpec, UNKNOWN_NAME};
pub use report::{Destination, ItemFailure, ItemResult, ItemSuccess, ObjectKey, RunReport};
pub use types::ObjectType;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported object type: {0}")]
    UnsupportedType(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid document: {0}")]
    Document(String),
}

pub type Result<T> = std::result::Result<T, Error>;
