//! tagmerge core
//!
//! Merges third-party player databases into a single `Players.json` tag
//! configuration:
//!
//! ```text
//! source JSON ──► ingest ──► Database[] ──┐
//!                                          ├──► reconcile ──► ImportedPlayerSet
//! Players.json (target) ──────────────────┘          │
//!                                                     ▼
//!                     AttributeMapping ──────────► build ──► Players.json
//! ```
//!
//! ## Key Properties
//!
//! - **Canonical identity**: every player id is normalized to an account id
//!   before comparison (`steam_id`)
//! - **Precedence**: the target's existing `Tags` beat every import, and
//!   earlier-loaded databases beat later ones
//! - **Full recompute**: reconciliation is a pure function of
//!   `(target, databases)`, re-run after every mutation
//! - **Non-destructive output**: `build` works on a clone of the target
//!
//! No I/O happens here; fetching and file reading live in `tagmerge-fetch`.

pub mod ingest;
pub mod mapping;
pub mod output;
pub mod reconcile;
pub mod session;
pub mod steam_id;

#[cfg(test)]
mod tests;

pub use ingest::{ingest, source_label, Database, IngestError, Origin, SourceDocument};
pub use mapping::{available_tags, AttributeMapping};
pub use output::{build, to_pretty_json, TagConfig, TargetDocument, OUTPUT_FILE_NAME};
pub use reconcile::{reconcile, ImportStats, ImportedPlayerSet, Reconciliation};
pub use session::{SessionError, SessionState};
pub use steam_id::{normalize, PlayerId};

/// Identifier of a tag declared in the target document's `Config`.
pub type TagId = String;
