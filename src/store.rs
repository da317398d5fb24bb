// 🗄️ Entry Store - the persisted, ordered list of contributions
//
// Layout on disk: CSV, header `Name,Category,Dish,Quantity`, one row per entry
// in insertion order.
//
// Every write replaces the whole file: rows go to a temporary file in the same
// directory, which is fsynced and then renamed over the data file. Readers open
// whichever complete version is current and never need the write gate.
// Writers are serialized by a single gate with a bounded wait.

use crate::entities::{CategoryRegistry, Entry};
use crate::error::{PersistenceError, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Column names, in on-disk order
pub const HEADER: [&str; 4] = ["Name", "Category", "Dish", "Quantity"];

pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// ON-DISK ROW
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
struct StoredRow {
    #[serde(rename = "Name")]
    name: String,

    #[serde(rename = "Category")]
    category: String,

    #[serde(rename = "Dish")]
    dish: String,

    #[serde(rename = "Quantity")]
    quantity: u32,
}

impl From<StoredRow> for Entry {
    fn from(row: StoredRow) -> Self {
        Entry {
            name: row.name,
            category: row.category,
            dish: row.dish,
            quantity: row.quantity,
        }
    }
}

impl From<&Entry> for StoredRow {
    fn from(entry: &Entry) -> Self {
        StoredRow {
            name: entry.name.clone(),
            category: entry.category.clone(),
            dish: entry.dish.clone(),
            quantity: entry.quantity,
        }
    }
}

// ============================================================================
// WRITE GATE
// ============================================================================

/// Single-writer gate. Acquisition gives up after `timeout`.
struct WriteGate {
    busy: Mutex<bool>,
    released: Condvar,
    timeout: Duration,
}

struct WriteGuard<'a> {
    gate: &'a WriteGate,
}

impl WriteGate {
    fn new(timeout: Duration) -> Self {
        WriteGate {
            busy: Mutex::new(false),
            released: Condvar::new(),
            timeout,
        }
    }

    fn acquire(&self) -> StoreResult<WriteGuard<'_>> {
        let busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut busy, _) = self
            .released
            .wait_timeout_while(busy, self.timeout, |busy| *busy)
            .unwrap_or_else(PoisonError::into_inner);

        if *busy {
            return Err(StoreError::Contended {
                waited: self.timeout,
            });
        }

        *busy = true;
        Ok(WriteGuard { gate: self })
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        let mut busy = self.gate.busy.lock().unwrap_or_else(PoisonError::into_inner);
        *busy = false;
        drop(busy);
        self.gate.released.notify_one();
    }
}

// ============================================================================
// ENTRY STORE
// ============================================================================

pub struct EntryStore {
    path: PathBuf,
    registry: Arc<CategoryRegistry>,
    gate: WriteGate,
}

impl EntryStore {
    /// Open the store at `path`, creating a header-only file if none exists.
    pub fn open(
        path: impl Into<PathBuf>,
        registry: Arc<CategoryRegistry>,
        lock_timeout: Duration,
    ) -> StoreResult<Self> {
        let store = EntryStore {
            path: path.into(),
            registry,
            gate: WriteGate::new(lock_timeout),
        };

        if !store.path.exists() {
            if let Some(parent) = store.parent_dir() {
                fs::create_dir_all(parent)?;
            }
            let _guard = store.gate.acquire()?;
            store.write_snapshot(&[])?;
            info!(path = %store.path.display(), "created empty entry store");
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// Snapshot of all entries in insertion order.
    pub fn load(&self) -> StoreResult<Vec<Entry>> {
        let file = File::open(&self.path)?;
        let mut rdr = csv::Reader::from_reader(file);

        let headers = rdr.headers()?;
        if headers.iter().ne(HEADER.iter().copied()) {
            return Err(PersistenceError::BadHeader {
                path: self.path.display().to_string(),
                found: headers.iter().map(str::to_string).collect(),
            }
            .into());
        }

        let mut entries = Vec::new();
        for result in rdr.deserialize() {
            let row: StoredRow = result?;
            entries.push(row.into());
        }

        debug!(len = entries.len(), "loaded entry snapshot");
        Ok(entries)
    }

    /// Append `entry` at the tail. Unknown categories are rejected before
    /// the file is touched.
    pub fn append(&self, entry: Entry) -> StoreResult<usize> {
        self.registry.require(&entry.category)?;

        self.mutate(move |entries| {
            entries.push(entry);
            Ok(entries.len() - 1)
        })
    }

    /// Atomically replace the whole collection with `entries`, in order.
    pub fn replace_all(&self, entries: &[Entry]) -> StoreResult<()> {
        let _guard = self.gate.acquire()?;
        self.write_snapshot(entries)
    }

    /// Load, transform and persist under the write gate.
    ///
    /// If `f` fails nothing is written and its error is returned.
    pub fn mutate<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Vec<Entry>) -> StoreResult<T>,
    {
        let _guard = self.gate.acquire()?;
        let mut entries = self.load()?;
        let out = f(&mut entries)?;
        self.write_snapshot(&entries)?;
        Ok(out)
    }

    /// The persisted file, byte for byte.
    pub fn raw_bytes(&self) -> StoreResult<Vec<u8>> {
        let mut bytes = Vec::new();
        File::open(&self.path)?.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// Positions of persisted entries whose category is no longer configured.
    pub fn audit(&self) -> StoreResult<Vec<usize>> {
        let retired: Vec<usize> = self
            .load()?
            .iter()
            .enumerate()
            .filter(|(_, entry)| !self.registry.validate(&entry.category))
            .map(|(index, _)| index)
            .collect();

        if !retired.is_empty() {
            warn!(
                count = retired.len(),
                "entries use categories that are no longer configured"
            );
        }
        Ok(retired)
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// Write `entries` to a temp file next to the data file and rename it into
    /// place. Callers must hold the write gate.
    fn write_snapshot(&self, entries: &[Entry]) -> StoreResult<()> {
        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::Builder::new()
            .prefix(".potluck-")
            .suffix(".tmp")
            .tempfile_in(dir)?;

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(tmp.as_file_mut());
            writer.write_record(HEADER)?;
            for entry in entries {
                writer.serialize(StoredRow::from(entry))?;
            }
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;

        // Dropping the PersistError removes the temp file
        tmp.persist(&self.path)
            .map_err(|e| PersistenceError::Promote(e.error))?;

        #[cfg(unix)]
        File::open(dir)?.sync_all()?;

        info!(len = entries.len(), path = %self.path.display(), "persisted entry snapshot");
        Ok(())
    }
}

impl std::fmt::Debug for EntryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore")
            .field("path", &self.path)
            .field("lock_timeout", &self.gate.timeout)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
