//! Async one-shot dataset loader.
//!
//! Runs the blocking [`DataManager`] load on tokio's blocking pool and
//! publishes its progress as a [`LoadState`] through a `watch` channel, so the
//! presentation layer moves from loading to ready (or failed) without any
//! shared mutable state.

use std::path::PathBuf;

use dashboard_core::error::DashboardError;
use dashboard_data::reader::{load_warning, RecordStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::data_manager::DataManager;

// ── Public types ──────────────────────────────────────────────────────────────

/// Progress of the dataset load as seen by the consumer.
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Ready(RecordStore),
    /// The load failed or was cancelled; the consumer continues with an empty
    /// record set and shows `warning`.
    Failed { warning: String },
}

impl LoadState {
    fn failed(error: &DashboardError) -> Self {
        LoadState::Failed {
            warning: load_warning(error),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// The records to render with, plus the warning to surface, if any.
    pub fn into_store(self) -> (RecordStore, Option<String>) {
        match self {
            LoadState::Ready(store) => (store, None),
            LoadState::Failed { warning } => (RecordStore::empty(), Some(warning)),
            LoadState::Loading => (RecordStore::empty(), None),
        }
    }
}

// ── DashboardLoader ───────────────────────────────────────────────────────────

/// Background loader for the session's single dataset snapshot.
pub struct DashboardLoader {
    data_path: PathBuf,
}

impl DashboardLoader {
    pub fn new(data_path: PathBuf) -> Self {
        Self { data_path }
    }

    /// Start the load.
    ///
    /// Spawns a tokio task that performs the load on the blocking pool and
    /// returns a [`LoadHandle`] for observing or aborting it.
    pub fn start(self) -> LoadHandle {
        let (tx, rx) = watch::channel(LoadState::Loading);
        let task_tx = tx.clone();
        let data_path = self.data_path;

        let handle = tokio::spawn(async move {
            tracing::debug!(path = %data_path.display(), "starting dataset load");
            let joined = tokio::task::spawn_blocking(move || {
                let mut manager = DataManager::new(data_path);
                manager.get_data();
                manager.into_parts()
            })
            .await;

            let state = match joined {
                Ok((store, None)) => LoadState::Ready(store),
                Ok((_, Some(warning))) => LoadState::Failed { warning },
                Err(e) => {
                    tracing::warn!(error = %e, "dataset load task did not complete");
                    LoadState::failed(&DashboardError::Cancelled)
                }
            };

            publish_settled(&task_tx, state);
        });

        LoadHandle { tx, rx, handle }
    }
}

// ── LoadHandle ────────────────────────────────────────────────────────────────

/// Replace a `Loading` state with `state`. The first settled state wins, so a
/// late load result cannot overwrite a cancellation or the reverse.
fn publish_settled(tx: &watch::Sender<LoadState>, state: LoadState) {
    tx.send_if_modified(|current| {
        if current.is_loading() {
            *current = state;
            true
        } else {
            false
        }
    });
}

/// A handle to the in-flight load.
pub struct LoadHandle {
    tx: watch::Sender<LoadState>,
    rx: watch::Receiver<LoadState>,
    handle: JoinHandle<()>,
}

impl LoadHandle {
    /// Current state without waiting.
    pub fn state(&self) -> LoadState {
        self.rx.borrow().clone()
    }

    /// An additional receiver for observers other than the owner.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.rx.clone()
    }

    /// Cancel the load. Every receiver sees a cancelled failure unless the
    /// load had already settled.
    pub fn abort(&self) {
        self.handle.abort();
        publish_settled(&self.tx, LoadState::failed(&DashboardError::Cancelled));
    }

    /// Wait for the load to settle. The handle stays usable, so a caller can
    /// still [`abort`](Self::abort) while waiting. Never returns
    /// [`LoadState::Loading`].
    pub async fn settled(&self) -> LoadState {
        let mut rx = self.rx.clone();
        loop {
            let state = rx.borrow_and_update().clone();
            if !state.is_loading() {
                return state;
            }
            if rx.changed().await.is_err() {
                return LoadState::failed(&DashboardError::Cancelled);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
