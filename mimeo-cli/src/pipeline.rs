//! The replication pipeline: list, expand versions, clean, emit.
//!
//! One run moves a single object type from the source endpoint to the
//! target endpoint. Endpoint misconfiguration and a failed source listing
//! abort the run; everything after that is accounted per item so one bad
//! document cannot stop the rest of the collection.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::{debug, info, warn};

use mimeo_common::{
    clean_object, CatalogObject, Destination, ItemFailure, ItemResult, ItemSuccess, ObjectKey,
    RunReport, UNKNOWN_NAME,
};

use crate::api::ApiClient;
use crate::config::RunConfig;
use crate::endpoint::{Endpoint, Side};
use crate::store::SnapshotStore;

enum Source {
    Api(ApiClient),
    Dir(SnapshotStore),
}

enum Target {
    Api(ApiClient),
    Dir(SnapshotStore),
}

/// One object pulled out of the source, not yet parsed. `label` is the
/// best name guess available if parsing fails (the file stem for local
/// sources).
struct BaseItem {
    label: String,
    value: Value,
}

pub struct Replicator {
    config: RunConfig,
    source: Source,
    target: Target,
}

impl Replicator {
    /// Resolve both endpoints and build their handles. Fails fast on
    /// configuration problems, before anything is read or written.
    pub fn new(config: RunConfig) -> Result<Self> {
        let source = match Endpoint::resolve(
            &config.source,
            config.source_api_key.as_deref(),
            Side::Source,
        )? {
            Endpoint::Api { base_url, api_key } => {
                Source::Api(ApiClient::new(&base_url, &api_key, config.verify_ssl)?)
            }
            Endpoint::Dir(path) => Source::Dir(SnapshotStore::new(path)),
        };

        let target = match Endpoint::resolve(
            &config.target,
            config.target_api_key.as_deref(),
            Side::Target,
        )? {
            Endpoint::Api { base_url, api_key } => {
                Target::Api(ApiClient::new(&base_url, &api_key, config.verify_ssl)?)
            }
            Endpoint::Dir(path) => Target::Dir(SnapshotStore::new(path)),
        };

        Ok(Self {
            config,
            source,
            target,
        })
    }

    /// Run the pipeline to completion. Per-item failures land in the
    /// report; only configuration and listing problems return an error.
    pub async fn run(&self) -> Result<RunReport> {
        let object_type = self.config.object_type;
        let clock = Instant::now();
        let mut report = RunReport::new(object_type);

        info!(
            source = %self.config.source,
            target = %self.config.target,
            "replicating {object_type}"
        );

        if let Target::Dir(store) = &self.target {
            store.ensure_layout(object_type)?;
        }

        let items = self.collect_base_items(&mut report).await?;

        let progress = self.item_progress(items.len() as u64);
        for item in items {
            self.replicate_item(item, &mut report).await;
            progress.inc(1);
        }
        progress.finish_and_clear();

        report.duration = clock.elapsed();
        debug!(
            successes = report.success_count(),
            failures = report.failure_count(),
            "run finished"
        );
        Ok(report)
    }

    /// Enumerate the source collection. A remote listing that fails aborts
    /// the run; a local file that will not read or parse becomes a failure
    /// entry and the rest of the directory still replicates.
    async fn collect_base_items(&self, report: &mut RunReport) -> Result<Vec<BaseItem>> {
        let object_type = self.config.object_type;

        match &self.source {
            Source::Api(client) => {
                let spinner =
                    self.list_spinner(format!("Fetching {object_type} from {}", client.base_url()));
                let listing = client
                    .list_objects(&self.config.project, object_type)
                    .await
                    .with_context(|| {
                        format!("listing {object_type} from {}", client.base_url())
                    });
                spinner.finish_and_clear();
                let items = listing?;

                debug!(count = items.len(), "fetched {object_type} listing");
                debug!(
                    "raw listing:\n{}",
                    serde_json::to_string_pretty(&items).unwrap_or_default()
                );

                if let Target::Dir(store) = &self.target {
                    store.write_list_dump(object_type, &items)?;
                }

                Ok(items
                    .into_iter()
                    .map(|value| BaseItem {
                        label: UNKNOWN_NAME.to_string(),
                        value,
                    })
                    .collect())
            }
            Source::Dir(store) => {
                let mut items = Vec::new();
                for path in store.object_files(object_type)? {
                    let stem = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
                    match store.read_document(&path) {
                        Ok(value) => items.push(BaseItem { label: stem, value }),
                        Err(e) => report.record(Err(ItemFailure::new(
                            ObjectKey::unversioned(object_type, stem),
                            format!("{e:#}"),
                        ))),
                    }
                }
                debug!(count = items.len(), "read {object_type} listing from disk");
                Ok(items)
            }
        }
    }

    /// Replicate one listed object, expanding it into versions first.
    async fn replicate_item(&self, item: BaseItem, report: &mut RunReport) {
        let object_type = self.config.object_type;

        let base = match CatalogObject::from_value(item.value.clone()) {
            Ok(base) => base,
            Err(e) => {
                report.record(Err(ItemFailure::new(
                    ObjectKey::unversioned(object_type, item.label),
                    e.to_string(),
                )));
                return;
            }
        };

        let name = base.name().to_string();
        let has_name = base.metadata.name.is_some();
        for value in self.expand_versions(&name, has_name, item.value).await {
            let outcome = self.replicate_version(&name, value).await;
            report.record(outcome);
        }
    }

    /// Expand a listed object into the versions to replicate. Only remote
    /// sources keep a history, and only for versioned types. A history
    /// that cannot be fetched degrades to the listed object itself.
    async fn expand_versions(&self, name: &str, has_name: bool, base: Value) -> Vec<Value> {
        let object_type = self.config.object_type;

        let client = match &self.source {
            Source::Api(client) => client,
            Source::Dir(_) => return vec![base],
        };
        if !object_type.versioned() || !has_name {
            return vec![base];
        }

        match client
            .list_versions(&self.config.project, object_type, name)
            .await
        {
            Ok(versions) => {
                if versions.is_empty() {
                    debug!(object = name, "version history is empty, nothing to copy");
                } else {
                    debug!(
                        object = name,
                        count = versions.len(),
                        "fetched version history"
                    );
                }
                versions
            }
            Err(e) => {
                warn!(
                    object = name,
                    error = %e,
                    "could not fetch version history, copying the listed object only"
                );
                vec![base]
            }
        }
    }

    /// Clean one version and hand it to the target. All failures are
    /// turned into report entries keyed by object and version.
    async fn replicate_version(&self, name: &str, value: Value) -> ItemResult {
        let object_type = self.config.object_type;

        let document = match CatalogObject::from_value(value.clone()) {
            Ok(document) => document,
            Err(e) => {
                return Err(ItemFailure::new(
                    ObjectKey::unversioned(object_type, name),
                    e.to_string(),
                ))
            }
        };

        let key = ObjectKey::new(
            object_type,
            name,
            document.version().map(str::to_string),
        );
        let cleaned = clean_object(&document, &self.config.project);

        debug!(
            object = %key,
            "raw document:\n{}",
            serde_json::to_string_pretty(&value).unwrap_or_default()
        );
        debug!(
            object = %key,
            "cleaned document:\n{}",
            serde_json::to_string_pretty(&cleaned).unwrap_or_default()
        );

        match &self.target {
            Target::Dir(store) => {
                let version = key.version.as_deref();
                let raw_path = match store.write_raw(object_type, name, version, &value) {
                    Ok(path) => path,
                    Err(e) => return Err(ItemFailure::new(key, format!("{e:#}"))),
                };
                debug!(object = %key, path = %raw_path.display(), "wrote raw copy");

                match store.write_cleaned(object_type, name, version, &cleaned) {
                    Ok(path) => Ok(ItemSuccess {
                        key,
                        destination: Destination::Disk { path },
                    }),
                    Err(e) => Err(ItemFailure::new(key, format!("{e:#}"))),
                }
            }
            Target::Api(client) => {
                match client
                    .publish(&self.config.project, object_type, &cleaned)
                    .await
                {
                    Ok(()) => Ok(ItemSuccess {
                        key,
                        destination: Destination::Api,
                    }),
                    Err(e) => Err(ItemFailure::new(key, e.to_string())),
                }
            }
        }
    }

    fn list_spinner(&self, message: String) -> ProgressBar {
        if self.config.debug {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    fn item_progress(&self, len: u64) -> ProgressBar {
        if self.config.debug {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap(),
        );
        bar
    }
}
