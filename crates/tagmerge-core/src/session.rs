//! Session state: the loaded inputs plus their derived merge result.

use crate::ingest::{Database, Origin};
use crate::mapping::{available_tags, AttributeMapping};
use crate::output::{build, TargetDocument};
use crate::reconcile::{reconcile, ImportStats, Reconciliation};
use crate::TagId;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("already loaded: {0}")]
    AlreadyLoaded(String),
}

/// Everything a single merge session holds.
///
/// `reconciliation` is derived from `(target, databases)` and rebuilt after
/// each mutation of either; the mapping is user state and only changes when
/// the user changes it.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    target: Option<TargetDocument>,
    databases: Vec<Database>,
    mapping: AttributeMapping,
    reconciliation: Reconciliation,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    fn refresh(&mut self) {
        self.reconciliation = reconcile(self.target.as_ref(), &self.databases);
        tracing::debug!(
            databases = self.databases.len(),
            target = self.target.is_some(),
            added = self.reconciliation.stats.added,
            "session refreshed"
        );
    }

    // ========================================================================
    // Databases
    // ========================================================================

    pub fn is_loaded(&self, locator: &str) -> bool {
        self.databases.iter().any(|db| db.locator == locator)
    }

    /// Append a database; later databases lose ties to earlier ones.
    ///
    /// A URL that is already loaded is refused. Local files are always
    /// appended, so re-reading a file counts its players as duplicates.
    pub fn add_database(&mut self, database: Database) -> Result<(), SessionError> {
        if database.origin == Origin::Network && self.is_loaded(&database.locator) {
            return Err(SessionError::AlreadyLoaded(database.locator));
        }
        self.databases.push(database);
        self.refresh();
        Ok(())
    }

    pub fn remove_database(&mut self, index: usize) -> Option<Database> {
        if index >= self.databases.len() {
            return None;
        }
        let removed = self.databases.remove(index);
        self.refresh();
        Some(removed)
    }

    pub fn databases(&self) -> &[Database] {
        &self.databases
    }

    // ========================================================================
    // Target document
    // ========================================================================

    /// Replace the target document (the previous one is discarded).
    pub fn set_target(&mut self, target: TargetDocument) {
        self.target = Some(target);
        self.refresh();
    }

    pub fn clear_target(&mut self) -> Option<TargetDocument> {
        let previous = self.target.take();
        self.refresh();
        previous
    }

    pub fn target(&self) -> Option<&TargetDocument> {
        self.target.as_ref()
    }

    /// Drop every database and the target. The mapping is kept.
    pub fn reset(&mut self) {
        self.databases.clear();
        self.target = None;
        self.refresh();
    }

    // ========================================================================
    // Mapping and derived views
    // ========================================================================

    pub fn mapping(&self) -> &AttributeMapping {
        &self.mapping
    }

    pub fn mapping_mut(&mut self) -> &mut AttributeMapping {
        &mut self.mapping
    }

    pub fn reconciliation(&self) -> &Reconciliation {
        &self.reconciliation
    }

    pub fn stats(&self) -> ImportStats {
        self.reconciliation.stats
    }

    pub fn available_tags(&self) -> Option<IndexMap<TagId, String>> {
        available_tags(self.target.as_ref())
    }

    pub fn build_output(&self) -> TargetDocument {
        build(
            self.target.as_ref(),
            &self.reconciliation.players,
            &self.mapping,
        )
    }
}
