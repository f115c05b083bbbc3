//! Per-run accounting of what replicated and what did not.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ObjectType;

/// Identity of one replicated object version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectKey {
    pub object_type: ObjectType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ObjectKey {
    pub fn new(object_type: ObjectType, name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            object_type,
            name: name.into(),
            version,
        }
    }

    pub fn unversioned(object_type: ObjectType, name: impl Into<String>) -> Self {
        Self::new(object_type, name, None)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.object_type, self.name)?;
        if let Some(version) = &self.version {
            write!(f, " ({version})")?;
        }
        Ok(())
    }
}

/// Where a cleaned object ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Destination {
    /// Written under a snapshot directory; `path` is the cleaned copy.
    Disk { path: PathBuf },
    /// Accepted by the target console.
    Api,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSuccess {
    #[serde(flatten)]
    pub key: ObjectKey,
    pub destination: Destination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailure {
    #[serde(flatten)]
    pub key: ObjectKey,
    pub reason: String,
}

impl ItemFailure {
    pub fn new(key: ObjectKey, reason: impl Into<String>) -> Self {
        Self {
            key,
            reason: reason.into(),
        }
    }
}

/// Outcome of replicating one object version.
pub type ItemResult = std::result::Result<ItemSuccess, ItemFailure>;

/// Everything that happened during one replication run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub object_type: ObjectType,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub results: Vec<ItemResult>,
}

impl RunReport {
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            object_type,
            started_at: Utc::now(),
            duration: Duration::ZERO,
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, result: ItemResult) {
        self.results.push(result);
    }

    pub fn successes(&self) -> impl Iterator<Item = &ItemSuccess> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemFailure> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
