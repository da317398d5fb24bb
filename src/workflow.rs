// Potluck workflow - the operations the request layer calls
//
// Plain operations (submit, list, summary) go straight to the store.
// Privileged ones check the admin gate first and never touch the store when
// it refuses. Edit and delete run load -> resolve -> transform -> replace
// inside `EntryStore::mutate`, so they are atomic with respect to each other.

use crate::admin::AdminGate;
use crate::entities::{CategoryRegistry, Entry, EntryRef};
use crate::error::{StoreError, StoreResult};
use crate::resolver::resolve_expected;
use crate::store::EntryStore;
use crate::summary::{summarize, CategorySummary};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Potluck {
    store: Arc<EntryStore>,
    admin: AdminGate,
}

impl Potluck {
    pub fn new(store: Arc<EntryStore>, admin: AdminGate) -> Self {
        Potluck { store, admin }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn categories(&self) -> &CategoryRegistry {
        self.store.registry()
    }

    // ========================================================================
    // PUBLIC OPERATIONS
    // ========================================================================

    /// Register a contribution; returns its position at the time of writing.
    pub fn submit(&self, entry: Entry) -> StoreResult<usize> {
        let category = entry.category.clone();
        let index = self.store.append(entry)?;
        info!(index, category = %category, "entry submitted");
        Ok(index)
    }

    pub fn entries(&self) -> StoreResult<Vec<Entry>> {
        self.store.load()
    }

    pub fn entry_refs(&self) -> StoreResult<Vec<EntryRef>> {
        Ok(self
            .store
            .load()?
            .into_iter()
            .enumerate()
            .map(|(index, entry)| EntryRef::new(index, entry))
            .collect())
    }

    pub fn summary(&self) -> StoreResult<Vec<CategorySummary>> {
        let entries = self.store.load()?;
        Ok(summarize(self.store.registry(), &entries))
    }

    // ========================================================================
    // ADMIN OPERATIONS
    // ========================================================================

    pub fn login(&self, password: &str) -> StoreResult<()> {
        self.authorize(password)
    }

    /// The persisted file, for download.
    pub fn export(&self, password: &str) -> StoreResult<Vec<u8>> {
        self.authorize(password)?;
        self.store.raw_bytes()
    }

    /// Replace the entry at `index` with `entry`.
    ///
    /// `expected` is the fingerprint of the entry the caller saw at `index`;
    /// when given, a mismatch fails with `StaleIndex`.
    pub fn edit(
        &self,
        password: &str,
        index: i64,
        entry: Entry,
        expected: Option<&str>,
    ) -> StoreResult<()> {
        self.authorize(password)?;
        self.store.registry().require(&entry.category)?;

        self.store.mutate(|entries| {
            let (position, _) = resolve_expected(entries, index, expected)?;
            entries[position] = entry;
            info!(index = position, "entry edited");
            Ok(())
        })
    }

    /// Remove the entry at `index`; later entries shift down by one.
    pub fn delete(&self, password: &str, index: i64, expected: Option<&str>) -> StoreResult<Entry> {
        self.authorize(password)?;

        self.store.mutate(|entries| {
            let (position, _) = resolve_expected(entries, index, expected)?;
            let removed = entries.remove(position);
            info!(index = position, remaining = entries.len(), "entry deleted");
            Ok(removed)
        })
    }

    fn authorize(&self, password: &str) -> StoreResult<()> {
        if self.admin.authorize(password) {
            Ok(())
        } else {
            warn!("rejected admin credential");
            Err(StoreError::Unauthorized)
        }
    }
}

/// Download name for the data file, e.g. `potluck_data_20261016-181500.csv`
pub fn export_file_name(data_file: &Path, at: DateTime<Utc>) -> String {
    let stem = data_file
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("potluck_data");
    format!("{}_{}.csv", stem, at.format("%Y%m%d-%H%M%S"))
}

// ============================================================================
// TESTS
// ============================================================================
