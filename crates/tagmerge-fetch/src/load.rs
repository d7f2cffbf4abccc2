//! Loading databases and target documents into core values.

use crate::config::FetchConfig;
use crate::http::{retrieve, FetchError, JsonSource};
use std::fs;
use std::path::Path;
use tagmerge_core::ingest::{ingest_value, IngestError};
use tagmerge_core::{Database, Origin, TargetDocument};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Retrieval(#[from] FetchError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Malformed(#[from] IngestError),
}

/// Retrieve and ingest a source database published at `url`.
pub fn load_url<S: JsonSource + ?Sized>(
    source: &S,
    config: &FetchConfig,
    url: &str,
) -> Result<Database, LoadError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme `{}`", parsed.scheme()),
        }
        .into());
    }

    let value = retrieve(source, config, url)?;
    Ok(ingest_value(value, url, Origin::Network)?)
}

fn read_json(path: &Path) -> Result<serde_json::Value, LoadError> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: display,
        source,
    })
}

/// Read and ingest a source database from a local file.
pub fn load_file(path: &Path) -> Result<Database, LoadError> {
    let value = read_json(path)?;
    let database = ingest_value(value, &path.display().to_string(), Origin::File)?;
    tracing::debug!(path = %path.display(), players = database.player_count(), "loaded database file");
    Ok(database)
}

/// Read the target `Players.json`.
pub fn load_target(path: &Path) -> Result<TargetDocument, LoadError> {
    let value = read_json(path)?;
    serde_json::from_value(value).map_err(|source| LoadError::Parse {
        path: path.display().to_string(),
        source,
    })
}
