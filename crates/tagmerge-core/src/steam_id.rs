//! Player identifier normalization.
//!
//! Source databases identify players either by a Steam3 id (`[U:1:<account>]`)
//! or by a 64-bit SteamID (`7656119...`). Both are reduced to the 32-bit
//! account id, written as a decimal string, which is also what the target
//! `Players.json` uses as its `Tags` key.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Offset between a SteamID64 and its account id (individual, public universe).
pub const STEAM64_BASE: i64 = 76_561_197_960_265_728;

/// Canonical player identity: the account id as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap an already-canonical id (e.g. a key read from the target's `Tags`).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

fn steam3_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[U:1:([0-9]+)\]").expect("static regex"))
}

fn steam64_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^7656[0-9]{13}$").expect("static regex"))
}

/// Normalize a raw identifier into a [`PlayerId`].
///
/// Tried in order:
/// 1. `[U:1:<digits>]` anywhere in the string, digits kept verbatim
/// 2. a 17-digit SteamID64 starting with `7656`, minus [`STEAM64_BASE`]
///
/// Anything else is `None`. Never panics.
pub fn normalize(raw: &str) -> Option<PlayerId> {
    if raw.is_empty() {
        return None;
    }

    if let Some(caps) = steam3_re().captures(raw) {
        return Some(PlayerId::new(&caps[1]));
    }

    if steam64_re().is_match(raw) {
        // 17 digits always fit an i64; the offset can still drive the result
        // negative for ids below the base, which is kept as-is.
        return raw
            .parse::<i64>()
            .ok()
            .and_then(|value| value.checked_sub(STEAM64_BASE))
            .map(|account| PlayerId::new(account.to_string()));
    }

    None
}
