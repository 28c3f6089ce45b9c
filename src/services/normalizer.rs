//! Builds the ID-keyed ignore table from a fetched module array.
//!
//! Two passes over the descriptors:
//! 1. every descriptor with both a name and an ID feeds the [`NameIdIndex`]
//! 2. every descriptor with a name, an ID and a well-formed ignore list gets
//!    a table entry, with names in its list resolved to IDs
//!
//! The second pass needs the complete index because ignore lists may refer
//! to modules listed later in the feed.

use crate::models::{IgnoreListField, IgnoreTable, ModuleDescriptor, NameIdIndex};
use serde_json::Value;

/// Result of one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFeed {
    pub ignore_table: IgnoreTable,
    pub index: NameIdIndex,
}

/// Normalize a raw feed array. Never fails; unusable entries are dropped.
pub fn normalize_modules(modules: &[Value]) -> NormalizedFeed {
    let descriptors: Vec<ModuleDescriptor> =
        modules.iter().map(ModuleDescriptor::from_value).collect();
    normalize_descriptors(&descriptors)
}

pub fn normalize_descriptors(descriptors: &[ModuleDescriptor]) -> NormalizedFeed {
    let mut index = NameIdIndex::new();
    for descriptor in descriptors {
        if let (Some(name), Some(id)) = (&descriptor.name, &descriptor.module_id) {
            index.insert(name, id);
        }
    }

    let mut ignore_table = IgnoreTable::new();
    for descriptor in descriptors {
        let Some(name) = &descriptor.name else {
            continue;
        };

        let entries = match &descriptor.ignore_list {
            IgnoreListField::Valid(entries) => entries,
            IgnoreListField::Malformed => {
                tracing::debug!("Ignore list of {} is malformed, skipping", name);
                continue;
            }
            IgnoreListField::Missing => continue,
        };

        let Some(id) = &descriptor.module_id else {
            tracing::warn!("Failed to load ModuleID for {}", name);
            continue;
        };

        let resolved = entries
            .iter()
            .map(|entry| index.id_for_name(entry).unwrap_or(entry.as_str()).to_string())
            .collect();

        ignore_table.insert(id.clone(), resolved);
    }

    NormalizedFeed {
        ignore_table,
        index,
    }
}
