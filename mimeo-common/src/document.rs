//! Typed model of a catalog object document.
//!
//! The console serves objects as free-form JSON. The fields the replicator
//! reads or rewrites are modeled explicitly; everything else rides along in
//! order-preserving `rest` maps so a document survives a round trip without
//! losing or reordering keys it does not understand. An explicit `null` in
//! a modeled field reads as absent; the key is not written back.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Placeholder used when a document carries no `metadata.name`.
pub const UNKNOWN_NAME: &str = "<unknown>";

/// One catalog object as fetched from a console or read from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogObject {
    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ObjectSpec>,

    /// Server-side runtime state. Never replicated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl CatalogObject {
    /// Parse one raw JSON document into the typed tree.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::Document(e.to_string()))
    }

    /// Resolved object name, or a placeholder when the document has none.
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }

    /// Version label from `spec.version`, when present.
    pub fn version(&self) -> Option<&str> {
        self.spec.as_ref().and_then(|s| s.version.as_deref())
    }
}

/// The `metadata` block. Audit fields are modeled so the cleaner can drop
/// them; unknown keys are preserved verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, rename = "projectID", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Value>,

    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,

    #[serde(default, rename = "modifiedAt", skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<Value>,

    #[serde(default, rename = "createdBy", skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Value>,

    #[serde(default, rename = "modifiedBy", skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<Value>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The `spec` block. Only the fields the pipeline touches are named.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<Hooks>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The `spec.hooks` field: a map of hook points, or any other shape the
/// console happens to serve, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Hooks {
    Points(IndexMap<String, HookList>),
    Other(Value),
}

/// The value under one hook point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HookList {
    Items(Vec<HookItem>),
    Other(Value),
}

/// One entry of a hook list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HookItem {
    Step(HookStep),
    Other(Value),
}

/// A hook step object. Agent pins are dropped on replication since agent
/// identities do not exist on the target console.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<Value>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}
