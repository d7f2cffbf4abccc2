//! Retrieval configuration.

use std::env;

/// Mirrors tried, in order, after the direct request fails.
pub const DEFAULT_MIRRORS: [&str; 2] = [
    "https://api.allorigins.win/raw?url=",
    "https://corsproxy.io/?url=",
];

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_USER_AGENT: &str = concat!("tagmerge/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// URL-forwarding prefixes; the percent-encoded target URL is appended.
    pub mirrors: Vec<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            mirrors: DEFAULT_MIRRORS.iter().map(|m| m.to_string()).collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Defaults, overridden by `TAGMERGE_MIRRORS` (comma separated, empty to
    /// disable), `TAGMERGE_TIMEOUT_SECS` and `TAGMERGE_USER_AGENT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(mirrors) = lookup("TAGMERGE_MIRRORS") {
            config.mirrors = mirrors
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(raw) = lookup("TAGMERGE_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = secs,
                _ => tracing::warn!(value = %raw, "ignoring invalid TAGMERGE_TIMEOUT_SECS"),
            }
        }

        if let Some(agent) = lookup("TAGMERGE_USER_AGENT").filter(|a| !a.trim().is_empty()) {
            config.user_agent = agent;
        }

        config
    }
}
