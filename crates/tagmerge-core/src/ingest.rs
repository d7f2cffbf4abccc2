//! Source database ingestion.
//!
//! A source document looks like:
//!
//! ```json
//! { "file_info": { "title": "Cheaters" },
//!   "players": [ { "steamid": "[U:1:123]", "attributes": ["cheater"] } ] }
//! ```
//!
//! Ingestion is a pure transform over an already-parsed document; fetching
//! the bytes is somebody else's job.

use crate::steam_id::{normalize, PlayerId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("malformed source {locator}: {reason}")]
    MalformedSource { locator: String, reason: String },
}

/// Where a database came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Network,
    File,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Network => "network",
            Origin::File => "file",
        }
    }
}

/// Raw source document, as published by database maintainers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub players: Option<Vec<RawPlayerRecord>>,
    #[serde(default)]
    pub file_info: Option<FileInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileInfo {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayerRecord {
    #[serde(default)]
    pub steamid: Option<String>,
    #[serde(default)]
    pub attributes: Option<Vec<String>>,
}

/// A normalized player entry of a loaded database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub attributes: IndexSet<String>,
}

/// One successfully loaded source database. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Database {
    pub name: String,
    pub origin: Origin,
    /// URL or file path the database was loaded from.
    pub locator: String,
    pub players: Vec<PlayerRecord>,
}

impl Database {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

/// Display label for a locator: last path segment with `.json` removed.
pub fn source_label(locator: &str) -> String {
    let segment = locator
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or(locator);
    segment.replacen(".json", "", 1)
}

/// Turn a parsed source document into a [`Database`].
///
/// Entries without an identifier, or whose identifier does not normalize,
/// are dropped silently.
pub fn ingest(
    document: SourceDocument,
    locator: &str,
    origin: Origin,
) -> Result<Database, IngestError> {
    let raw_players = document
        .players
        .ok_or_else(|| IngestError::MalformedSource {
            locator: locator.to_string(),
            reason: "missing `players` list".to_string(),
        })?;

    let total = raw_players.len();
    let players: Vec<PlayerRecord> = raw_players
        .into_iter()
        .filter_map(|raw| {
            let steamid = raw.steamid.filter(|s| !s.is_empty())?;
            let id = normalize(&steamid)?;
            Some(PlayerRecord {
                id,
                attributes: raw.attributes.unwrap_or_default().into_iter().collect(),
            })
        })
        .collect();

    let name = document
        .file_info
        .and_then(|info| info.title)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| source_label(locator));

    tracing::debug!(
        locator,
        origin = origin.as_str(),
        name = %name,
        kept = players.len(),
        dropped = total - players.len(),
        "ingested source database"
    );

    Ok(Database {
        name,
        origin,
        locator: locator.to_string(),
        players,
    })
}

/// Ingest from an arbitrary JSON value; a document of the wrong shape is
/// reported as [`IngestError::MalformedSource`].
pub fn ingest_value(
    value: serde_json::Value,
    locator: &str,
    origin: Origin,
) -> Result<Database, IngestError> {
    let document: SourceDocument =
        serde_json::from_value(value).map_err(|err| IngestError::MalformedSource {
            locator: locator.to_string(),
            reason: err.to_string(),
        })?;
    ingest(document, locator, origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn label_strips_path_and_extension() {
        assert_eq!(source_label("https://example.org/db/cheaters.json"), "cheaters");
        assert_eq!(source_label("C:\\dbs\\bots.json"), "bots");
        assert_eq!(source_label("plain"), "plain");
    }

    #[test]
    fn title_wins_over_label() {
        let db = ingest_value(
            json!({ "file_info": { "title": "Known Bots" }, "players": [] }),
            "https://example.org/bots.json",
            Origin::Network,
        )
        .unwrap();
        assert_eq!(db.name, "Known Bots");
        assert_eq!(db.origin, Origin::Network);
        assert_eq!(db.player_count(), 0);
    }

    #[test]
    fn empty_title_falls_back_to_label() {
        let db = ingest_value(
            json!({ "file_info": { "title": "" }, "players": [] }),
            "/tmp/local.json",
            Origin::File,
        )
        .unwrap();
        assert_eq!(db.name, "local");
    }

    #[test]
    fn missing_players_is_malformed() {
        let err = ingest_value(json!({ "file_info": {} }), "x.json", Origin::File).unwrap_err();
        assert!(matches!(err, IngestError::MalformedSource { .. }));

        let err = ingest_value(json!({ "players": 3 }), "x.json", Origin::File).unwrap_err();
        assert!(matches!(err, IngestError::MalformedSource { .. }));
    }

    #[test]
    fn unusable_identifiers_are_dropped() {
        let db = ingest_value(
            json!({ "players": [
                { "steamid": "[U:1:10]", "attributes": ["cheater", "cheater", "bot"] },
                { "steamid": "", "attributes": ["x"] },
                { "attributes": ["y"] },
                { "steamid": "garbage" },
                { "steamid": "76561197960265738" }
            ]}),
            "db.json",
            Origin::File,
        )
        .unwrap();

        let ids: Vec<&str> = db.players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "10"]);
        let first: Vec<&str> = db.players[0].attributes.iter().map(String::as_str).collect();
        assert_eq!(first, vec!["cheater", "bot"]);
        assert!(db.players[1].attributes.is_empty());
    }
}
