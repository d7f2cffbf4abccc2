//! Source retrieval for tagmerge
//!
//! The I/O side of a merge session:
//! - fetch a source database over HTTP, falling back to URL-forwarding mirrors
//! - read source databases and the target `Players.json` from disk
//!
//! Everything here ends in a `tagmerge_core` value or a [`LoadError`]; a
//! failed load never produces a partial database.

pub mod config;
pub mod http;
pub mod load;

pub use config::FetchConfig;
pub use http::{mirror_url, retrieve, FetchError, HttpFetcher, JsonSource};
pub use load::{load_file, load_target, load_url, LoadError};
