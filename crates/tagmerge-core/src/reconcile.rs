//! Reconciliation: merge loaded databases against the target document.
//!
//! Precedence, highest first:
//! 1. players already tagged in the target's `Tags`
//! 2. databases in load order
//! 3. records in ingestion order within a database
//!
//! A record losing to a higher-precedence one is counted as a duplicate and
//! otherwise ignored. The whole result is recomputed on every call.

use crate::ingest::Database;
use crate::output::TargetDocument;
use crate::steam_id::PlayerId;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::HashSet;

/// Newly importable players and their attribute sets, in first-seen order.
pub type ImportedPlayerSet = IndexMap<PlayerId, IndexSet<String>>;

/// Every attribute seen on any record, duplicates included.
pub type AttributeUniverse = IndexSet<String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Records seen across all databases.
    pub imported: usize,
    /// Records that became new entries.
    pub added: usize,
    /// Records whose id was already tagged or already added.
    pub duplicates: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub players: ImportedPlayerSet,
    pub attributes: AttributeUniverse,
    pub stats: ImportStats,
}

impl Reconciliation {
    /// Number of imported players holding each attribute of the universe.
    ///
    /// Attributes only seen on duplicate records report 0.
    pub fn attribute_counts(&self) -> IndexMap<String, usize> {
        let mut counts: IndexMap<String, usize> =
            self.attributes.iter().map(|a| (a.clone(), 0)).collect();
        for attributes in self.players.values() {
            for attribute in attributes {
                if let Some(count) = counts.get_mut(attribute) {
                    *count += 1;
                }
            }
        }
        counts
    }
}

/// Merge `databases` (in load order) against `target`.
pub fn reconcile(target: Option<&TargetDocument>, databases: &[Database]) -> Reconciliation {
    let mut excluded: HashSet<&PlayerId> = target
        .map(|doc| doc.tags.keys().collect())
        .unwrap_or_default();

    let mut result = Reconciliation::default();

    for database in databases {
        for player in &database.players {
            result.stats.imported += 1;
            result
                .attributes
                .extend(player.attributes.iter().cloned());

            if excluded.contains(&player.id) || result.players.contains_key(&player.id) {
                result.stats.duplicates += 1;
                continue;
            }

            result
                .players
                .insert(player.id.clone(), player.attributes.clone());
            excluded.insert(&player.id);
            result.stats.added += 1;
        }
    }

    tracing::debug!(
        databases = databases.len(),
        imported = result.stats.imported,
        added = result.stats.added,
        duplicates = result.stats.duplicates,
        "reconciled"
    );

    result
}
