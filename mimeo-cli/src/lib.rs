//! Library surface of the mimeo replicator CLI.
//!
//! The binary in `main.rs` wires these modules together; they are exposed
//! as a library so the integration tests can drive the pipeline directly.

pub mod api;
pub mod config;
pub mod endpoint;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod store;
