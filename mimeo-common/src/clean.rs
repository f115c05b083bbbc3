//! The cleaning transformation applied to every object before it is
//! written to a snapshot or published to a target console.
//!
//! Cleaning strips server-assigned identity and audit fields, sharing and
//! agent pins that are meaningless outside the source console, and the
//! entire `status` block, then stamps the configured project name. It is
//! total: any parseable document cleans without error, and cleaning an
//! already-clean document changes nothing.

use crate::document::{CatalogObject, HookItem, HookList, Hooks};

/// Produce the publishable form of `object` for `project`.
pub fn clean_object(object: &CatalogObject, project: &str) -> CatalogObject {
    let mut cleaned = object.clone();

    cleaned.metadata.id = None;
    cleaned.metadata.project_id = None;
    cleaned.metadata.created_at = None;
    cleaned.metadata.modified_at = None;
    cleaned.metadata.created_by = None;
    cleaned.metadata.modified_by = None;
    cleaned.metadata.project = Some(project.to_string());

    if let Some(spec) = cleaned.spec.as_mut() {
        spec.sharing = None;
        spec.agents = None;
        if let Some(Hooks::Points(points)) = spec.hooks.as_mut() {
            for hook_list in points.values_mut() {
                if let HookList::Items(items) = hook_list {
                    for item in items {
                        if let HookItem::Step(step) = item {
                            step.agents = None;
                        }
                    }
                }
            }
        }
    }

    cleaned.status = None;

    cleaned
}
