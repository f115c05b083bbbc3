//! Snapshot directory layout: reading and writing catalog objects on disk.
//!
//! A snapshot keeps, per object type, the cleaned documents at
//! `<root>/<type>/<name>[-<version>].json`, verbatim server copies under
//! `<root>/<type>/raw/`, and the raw collection listing in
//! `raw-dump-get.json` next to the cleaned files.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use mimeo_common::{CatalogObject, ObjectType};

/// File the raw collection listing is dumped to. Never read back as an
/// object, so listings skip it.
pub const LIST_DUMP_FILE: &str = "raw-dump-get.json";

/// One snapshot directory, used as a replication source or target.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn type_dir(&self, object_type: ObjectType) -> PathBuf {
        self.root.join(object_type.as_str())
    }

    /// Create the type directory up front so even an all-failure run
    /// leaves the expected layout behind.
    pub fn ensure_layout(&self, object_type: ObjectType) -> Result<()> {
        let dir = self.type_dir(object_type);
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        Ok(())
    }

    /// Cleaned object files for one type, sorted by file name. A missing
    /// type directory is an empty collection, not an error.
    pub fn object_files(&self, object_type: ObjectType) -> Result<Vec<PathBuf>> {
        let dir = self.type_dir(object_type);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries =
            fs::read_dir(&dir).with_context(|| format!("reading {}", dir.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("reading {}", dir.display()))?
                .path();
            if !path.is_file() || path.extension().and_then(OsStr::to_str) != Some("json") {
                continue;
            }
            if path.file_name().and_then(OsStr::to_str) == Some(LIST_DUMP_FILE) {
                continue;
            }
            files.push(path);
        }

        files.sort();
        Ok(files)
    }

    /// Read and parse one document file.
    pub fn read_document(&self, path: &Path) -> Result<Value> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let document = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(document)
    }

    /// Write the verbatim server copy under `<type>/raw/`.
    pub fn write_raw(
        &self,
        object_type: ObjectType,
        name: &str,
        version: Option<&str>,
        document: &Value,
    ) -> Result<PathBuf> {
        self.write_json(self.object_path(object_type, true, name, version), document)
    }

    /// Write the cleaned copy at the top of the type directory.
    pub fn write_cleaned(
        &self,
        object_type: ObjectType,
        name: &str,
        version: Option<&str>,
        document: &CatalogObject,
    ) -> Result<PathBuf> {
        self.write_json(
            self.object_path(object_type, false, name, version),
            document,
        )
    }

    /// Dump the raw collection listing for later inspection.
    pub fn write_list_dump(&self, object_type: ObjectType, items: &[Value]) -> Result<PathBuf> {
        self.write_json(self.type_dir(object_type).join(LIST_DUMP_FILE), &items)
    }

    fn object_path(
        &self,
        object_type: ObjectType,
        raw: bool,
        name: &str,
        version: Option<&str>,
    ) -> PathBuf {
        let mut dir = self.type_dir(object_type);
        if raw {
            dir.push("raw");
        }
        let file_name = match version {
            Some(version) => format!("{name}-{version}.json"),
            None => format!("{name}.json"),
        };
        dir.join(file_name)
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: PathBuf, document: &T) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(document)?;
        fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}
