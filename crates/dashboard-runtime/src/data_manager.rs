//! Single-snapshot data manager for the dashboard runtime.
//!
//! Wraps the record loader with a one-shot cache: the dataset is read on the
//! first [`DataManager::get_data`] call and the same snapshot is served for the
//! rest of the session. A failed load is not retried; the manager serves an
//! empty store and keeps the warning for the caller to surface.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use dashboard_data::reader::{load_or_empty, RecordStore};

// ── DataManager ───────────────────────────────────────────────────────────────

/// One-snapshot wrapper around the dataset loader.
///
/// # Example
/// ```no_run
/// use dashboard_runtime::data_manager::DataManager;
///
/// let mut mgr = DataManager::new("fir_database_en_with_coordinates.json".into());
/// let store = mgr.get_data();
/// println!("records: {}", store.len());
/// ```
pub struct DataManager {
    data_path: PathBuf,
    /// The loaded snapshot, `None` until the first fetch.
    snapshot: Option<RecordStore>,
    /// Warning from the last failed load.
    last_error: Option<String>,
    /// When the snapshot was last replaced.
    fetched_at: Option<DateTime<Utc>>,
}

impl DataManager {
    pub fn new(data_path: PathBuf) -> Self {
        Self {
            data_path,
            snapshot: None,
            last_error: None,
            fetched_at: None,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the session snapshot, loading it on first use.
    pub fn get_data(&mut self) -> &RecordStore {
        if self.snapshot.is_none() {
            self.fetch();
        }
        self.snapshot.get_or_insert_with(RecordStore::empty)
    }

    /// Replace the whole snapshot with a fresh load.
    pub fn reload(&mut self) -> &RecordStore {
        tracing::debug!(path = %self.data_path.display(), "reloading dataset");
        self.fetch();
        self.snapshot.get_or_insert_with(RecordStore::empty)
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Warning from the last failed load, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Consume the manager, returning the snapshot (empty if never loaded)
    /// and the pending warning.
    pub fn into_parts(self) -> (RecordStore, Option<String>) {
        (
            self.snapshot.unwrap_or_else(RecordStore::empty),
            self.last_error,
        )
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn fetch(&mut self) {
        let (store, warning) = load_or_empty(&self.data_path);
        tracing::debug!(
            records = store.len(),
            dropped = store.dropped(),
            failed = warning.is_some(),
            "dataset snapshot updated"
        );
        self.snapshot = Some(store);
        self.last_error = warning;
        self.fetched_at = Some(Utc::now());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
