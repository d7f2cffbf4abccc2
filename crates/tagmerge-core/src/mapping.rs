//! Attribute → tag mapping.

use crate::output::TargetDocument;
use crate::TagId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// User-declared translation of source attributes into target tags.
///
/// Keyed by attribute name only, so it survives any number of
/// reconciliation runs. An empty tag id means "skip".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMapping {
    entries: IndexMap<String, TagId>,
}

impl AttributeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag assigned to `attribute`, `None` when unmapped or skipped.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.entries
            .get(attribute)
            .map(String::as_str)
            .filter(|tag| !tag.is_empty())
    }

    /// Assign `tag` to `attribute`; an empty tag marks it skipped.
    pub fn set(&mut self, attribute: impl Into<String>, tag: impl Into<TagId>) {
        self.entries.insert(attribute.into(), tag.into());
    }

    pub fn clear(&mut self, attribute: &str) -> Option<TagId> {
        self.entries.shift_remove(attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(a, t)| (a.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a `{ "attribute": "tagId" }` JSON object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Mapped tag ids the target's `Config` does not declare, sorted.
    pub fn unknown_tags(&self, available: &IndexMap<TagId, String>) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .iter()
            .map(|(_, tag)| tag)
            .filter(|tag| !tag.is_empty() && !available.contains_key(*tag))
            .collect();
        unknown.sort_unstable();
        unknown.dedup();
        unknown
    }
}

/// Tags offered for mapping: tag id → display name.
///
/// `None` when there is no target or it has no `Config` section; no mapping
/// should be offered then.
pub fn available_tags(target: Option<&TargetDocument>) -> Option<IndexMap<TagId, String>> {
    let config = target?.config.as_ref()?;
    Some(
        config
            .iter()
            .map(|(id, entry)| {
                let name = entry
                    .name()
                    .filter(|name| !name.is_empty())
                    .unwrap_or(id);
                (id.clone(), name.to_string())
            })
            .collect(),
    )
}
