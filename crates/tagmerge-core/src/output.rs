//! Target document (`Players.json`) model and the output builder.

use crate::mapping::AttributeMapping;
use crate::reconcile::ImportedPlayerSet;
use crate::steam_id::PlayerId;
use crate::TagId;
use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// File name the merged document is delivered under.
pub const OUTPUT_FILE_NAME: &str = "Players.json";

/// The destination configuration:
///
/// ```json
/// { "Config": { "vip": { "Name": "VIP", "Color": "gold" } },
///   "Tags":   { "12345": ["vip"] } }
/// ```
///
/// Fields this crate does not understand are carried through untouched, and
/// top-level keys are written back in the order they were read. A `Config`
/// that is not an object (e.g. `null`) is kept in `extra` as it was, and
/// `config` is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetDocument {
    pub config: Option<IndexMap<TagId, TagConfig>>,
    pub tags: IndexMap<PlayerId, Vec<TagId>>,
    pub extra: Map<String, Value>,
    layout: Vec<String>,
}

/// One `Config` entry, kept verbatim. Usually `{ "Name": ..., ... }`, but any
/// JSON value is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagConfig(pub Value);

impl TagConfig {
    /// The `Name` field, when the entry is an object carrying a string name.
    pub fn name(&self) -> Option<&str> {
        self.0.get("Name").and_then(Value::as_str)
    }
}

const CONFIG_KEY: &str = "Config";
const TAGS_KEY: &str = "Tags";

impl TargetDocument {
    /// `{"Config": {}, "Tags": {}}`, the implicit document when none is loaded.
    pub fn empty() -> Self {
        Self {
            config: Some(IndexMap::new()),
            ..Self::default()
        }
    }

    pub fn tagged_players(&self) -> usize {
        self.tags.len()
    }
}

impl<'de> Deserialize<'de> for TargetDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let layout = fields.keys().cloned().collect();

        let config: Option<IndexMap<TagId, TagConfig>> =
            if matches!(fields.get(CONFIG_KEY), Some(Value::Object(_))) {
                fields
                    .remove(CONFIG_KEY)
                    .map(serde_json::from_value)
                    .transpose()
                    .map_err(de::Error::custom)?
            } else {
                None
            };
        let tags = match fields.remove(TAGS_KEY) {
            None | Some(Value::Null) => IndexMap::new(),
            Some(value) => serde_json::from_value(value).map_err(de::Error::custom)?,
        };

        Ok(Self {
            config,
            tags,
            extra: fields,
            layout,
        })
    }
}

impl Serialize for TargetDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut keys: Vec<&str> = self.layout.iter().map(String::as_str).collect();
        for key in [CONFIG_KEY, TAGS_KEY]
            .into_iter()
            .chain(self.extra.keys().map(String::as_str))
        {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        let mut map = serializer.serialize_map(None)?;
        for key in keys {
            match (key, &self.config) {
                (CONFIG_KEY, Some(config)) => map.serialize_entry(key, config)?,
                (TAGS_KEY, _) => map.serialize_entry(key, &self.tags)?,
                _ => {
                    if let Some(value) = self.extra.get(key) {
                        map.serialize_entry(key, value)?;
                    }
                }
            }
        }
        map.end()
    }
}

/// Build the merged document.
///
/// Works on a clone of `target`. Each imported player's attributes are
/// translated through `mapping`; unmapped ones are dropped, and a player with
/// no surviving tag gets no entry.
pub fn build(
    target: Option<&TargetDocument>,
    imported: &ImportedPlayerSet,
    mapping: &AttributeMapping,
) -> TargetDocument {
    let mut output = target.cloned().unwrap_or_else(TargetDocument::empty);

    for (id, attributes) in imported {
        let tags: Vec<TagId> = attributes
            .iter()
            .filter_map(|attribute| mapping.get(attribute))
            .map(str::to_string)
            .collect();
        if !tags.is_empty() {
            output.tags.insert(id.clone(), tags);
        }
    }

    output
}

/// Serialize with 4-space indentation.
pub fn to_pretty_json(document: &TargetDocument) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut ser)?;
    Ok(buf)
}
