//! HTTP retrieval with mirror fallback.

use crate::config::FetchConfig;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("http status {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("response from {url} is not JSON: {reason}")]
    Body { url: String, reason: String },
    #[error("could not retrieve {url}: all {attempts} attempts failed")]
    Retrieval { url: String, attempts: usize },
}

/// Something that can GET a URL and parse the body as JSON.
pub trait JsonSource {
    fn fetch_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// Blocking `reqwest` client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl JsonSource for HttpFetcher {
    fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.json::<Value>().map_err(|e| FetchError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Mirror request URL: the mirror prefix followed by the percent-encoded target.
pub fn mirror_url(mirror: &str, target: &str) -> String {
    format!("{mirror}{}", urlencoding::encode(target))
}

/// Fetch `url` directly, then through each configured mirror in order.
///
/// The first attempt yielding JSON wins. Attempts are not retried.
pub fn retrieve<S: JsonSource + ?Sized>(
    source: &S,
    config: &FetchConfig,
    url: &str,
) -> Result<Value, FetchError> {
    let attempts = std::iter::once(url.to_string())
        .chain(config.mirrors.iter().map(|mirror| mirror_url(mirror, url)));

    let mut tried = 0;
    for attempt in attempts {
        tried += 1;
        match source.fetch_json(&attempt) {
            Ok(value) => {
                tracing::debug!(url, via = %attempt, "retrieved source");
                return Ok(value);
            }
            Err(err) => tracing::warn!(url, via = %attempt, error = %err, "retrieval attempt failed"),
        }
    }

    Err(FetchError::Retrieval {
        url: url.to_string(),
        attempts: tried,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Answers only the URLs it was told to, recording every request.
    struct Scripted {
        ok_for: Vec<String>,
        seen: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(ok_for: &[String]) -> Self {
            Self {
                ok_for: ok_for.to_vec(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl JsonSource for Scripted {
        fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
            self.seen.borrow_mut().push(url.to_string());
            if self.ok_for.iter().any(|u| u == url) {
                Ok(serde_json::json!({ "players": [] }))
            } else {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 403,
                })
            }
        }
    }

    const TARGET: &str = "https://example.org/db/bots.json?v=1&x=a b";

    #[test]
    fn mirror_url_encodes_the_target() {
        assert_eq!(
            mirror_url("https://corsproxy.io/?url=", TARGET),
            "https://corsproxy.io/?url=https%3A%2F%2Fexample.org%2Fdb%2Fbots.json%3Fv%3D1%26x%3Da%20b"
        );
    }

    #[test]
    fn direct_success_skips_mirrors() {
        let source = Scripted::new(&[TARGET.to_string()]);
        retrieve(&source, &FetchConfig::default(), TARGET).unwrap();
        assert_eq!(source.seen.borrow().len(), 1);
    }

    #[test]
    fn mirrors_are_tried_in_order() {
        let config = FetchConfig::default();
        let second = mirror_url(&config.mirrors[1], TARGET);
        let source = Scripted::new(&[second.clone()]);

        retrieve(&source, &config, TARGET).unwrap();
        assert_eq!(
            *source.seen.borrow(),
            vec![
                TARGET.to_string(),
                mirror_url(&config.mirrors[0], TARGET),
                second
            ]
        );
    }

    #[test]
    fn all_failing_is_a_retrieval_failure() {
        let source = Scripted::new(&[]);
        let err = retrieve(&source, &FetchConfig::default(), TARGET).unwrap_err();
        assert!(matches!(err, FetchError::Retrieval { attempts: 3, .. }));
    }
}
