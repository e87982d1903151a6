//! Skill embedding cache with bundled fallback and remote sync
//!
//! The in-memory set is sourced, in priority order, from memory, the
//! persisted cache blob, the bundled dataset, or the remote store. Every
//! refresh replaces the whole set; nothing is merged.
//!
//! Two layers of API are exposed:
//! - best-effort methods (`get_embeddings`, `sync_from_cloud`, ...) that never
//!   fail and degrade to the last known data,
//! - `try_*` methods returning `Result` so callers can tell "no data" apart
//!   from "the read failed".

use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::domain::embedding::{
    embedding_dimensions, find_by_skill, skill_names, EmbeddingDataset, SkillEmbedding,
};
use crate::domain::key_value::{KeyValueStore, KeyValueStoreExt};
use crate::domain::sync::{
    parse_flag, parse_timestamp, Clock, RemoteEmbeddingRow, RemoteEmbeddingStore, SyncState,
    SystemClock, EMBEDDINGS_CACHE_KEY, LAST_SYNC_KEY, OFFLINE_MODE_KEY, SKILL_NAMES_KEY,
};
use crate::domain::DomainError;

/// Outcome of a successful upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadReport {
    /// Rows sent to the remote store
    pub uploaded: usize,
    /// Whether the remote rows were cleared before the upsert
    pub cleared_remote: bool,
}

/// Snapshot of the service state
#[derive(Debug, Clone, PartialEq)]
pub struct SyncStatus {
    pub offline_mode: bool,
    pub last_sync_timestamp: Option<i64>,
    pub embedding_count: usize,
    pub dimensions: Option<usize>,
    pub remote_store: &'static str,
}

#[derive(Debug, Default)]
struct ServiceState {
    initialized: bool,
    sync: SyncState,
    embeddings: Vec<SkillEmbedding>,
}

/// Service owning the in-memory skill embedding set
///
/// Construct once at start-up and share by `Arc`.
pub struct EmbeddingSyncService {
    store: Arc<dyn KeyValueStore>,
    dataset: Arc<dyn EmbeddingDataset>,
    remote: Arc<dyn RemoteEmbeddingStore>,
    clock: Arc<dyn Clock>,
    state: RwLock<ServiceState>,
    init_lock: Mutex<()>,
}

impl fmt::Debug for EmbeddingSyncService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingSyncService")
            .field("store", &self.store)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl EmbeddingSyncService {
    /// Creates a service using the system clock
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        dataset: Arc<dyn EmbeddingDataset>,
        remote: Arc<dyn RemoteEmbeddingStore>,
    ) -> Self {
        Self::with_clock(store, dataset, remote, Arc::new(SystemClock))
    }

    /// Creates a service with a custom clock
    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        dataset: Arc<dyn EmbeddingDataset>,
        remote: Arc<dyn RemoteEmbeddingStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            dataset,
            remote,
            clock,
            state: RwLock::new(ServiceState::default()),
            init_lock: Mutex::new(()),
        }
    }

    /// One-time setup: reads persisted flags and loads the cached set
    ///
    /// Later calls return immediately. Read failures leave safe defaults.
    pub async fn initialize(&self) {
        if self.state.read().await.initialized {
            return;
        }

        let _guard = self.init_lock.lock().await;

        if self.state.read().await.initialized {
            return;
        }

        let offline_mode = match self.store.get_raw(OFFLINE_MODE_KEY).await {
            Ok(value) => value.as_deref().is_some_and(parse_flag),
            Err(e) => {
                warn!(error = %e, "Failed to read offline mode, defaulting to online");
                false
            }
        };

        let last_sync_timestamp = self.last_sync_time().await;
        let embeddings = self.load_cached_embeddings().await;

        let mut state = self.state.write().await;
        state.sync = SyncState {
            last_sync_timestamp,
            offline_mode,
        };
        state.embeddings = embeddings;
        state.initialized = true;

        info!(
            offline_mode,
            last_sync = ?last_sync_timestamp,
            count = state.embeddings.len(),
            "Embedding service initialized"
        );
    }

    /// Sets and persists the offline mode preference
    pub async fn set_offline_mode(&self, offline: bool) {
        self.initialize().await;
        self.state.write().await.sync.offline_mode = offline;

        let value = if offline { "true" } else { "false" };
        if let Err(e) = self.store.set_raw(OFFLINE_MODE_KEY, value).await {
            warn!(error = %e, offline, "Failed to persist offline mode");
        }

        info!(offline, "Offline mode updated");
    }

    /// Current offline mode flag
    pub async fn offline_mode(&self) -> bool {
        self.state.read().await.sync.offline_mode
    }

    /// Persisted timestamp of the last sync in epoch millis, if any
    pub async fn last_sync_time(&self) -> Option<i64> {
        match self.store.get_raw(LAST_SYNC_KEY).await {
            Ok(value) => value.as_deref().and_then(parse_timestamp),
            Err(e) => {
                warn!(error = %e, "Failed to read last sync time");
                None
            }
        }
    }

    /// Returns the embedding set, refreshing from the remote store when stale
    ///
    /// Never fails; remote errors degrade to the last known set.
    pub async fn get_embeddings(&self) -> Vec<SkillEmbedding> {
        self.initialize().await;

        if self.state.read().await.embeddings.is_empty() {
            let loaded = self.load_cached_embeddings().await;
            self.state.write().await.embeddings = loaded;
        }

        let sync = self.state.read().await.sync;
        let now = self.clock.now_millis();

        if sync.should_sync(now) {
            debug!(last_sync = ?sync.last_sync_timestamp, "Embeddings stale, syncing");
            return self.sync_from_cloud().await;
        }

        self.current_embeddings().await
    }

    /// First embedding whose skill name matches exactly
    pub async fn get_embedding_by_skill(&self, skill_name: &str) -> Option<SkillEmbedding> {
        let embeddings = self.get_embeddings().await;
        find_by_skill(&embeddings, skill_name).cloned()
    }

    /// Snapshot of the current state without triggering a sync
    pub async fn status(&self) -> SyncStatus {
        self.initialize().await;

        let state = self.state.read().await;
        SyncStatus {
            offline_mode: state.sync.offline_mode,
            last_sync_timestamp: state.sync.last_sync_timestamp,
            embedding_count: state.embeddings.len(),
            dimensions: embedding_dimensions(&state.embeddings),
            remote_store: self.remote.store_name(),
        }
    }

    /// Reads the persisted cache, falling back to the bundled dataset
    ///
    /// Returns an empty set on failure without touching persisted state.
    pub async fn load_cached_embeddings(&self) -> Vec<SkillEmbedding> {
        match self.try_load_cached_embeddings().await {
            Ok(embeddings) => embeddings,
            Err(e) => {
                error!(error = %e, "Failed to load cached embeddings");
                Vec::new()
            }
        }
    }

    /// Reads the persisted cache, falling back to the bundled dataset
    pub async fn try_load_cached_embeddings(&self) -> Result<Vec<SkillEmbedding>, DomainError> {
        match self
            .store
            .get_json::<Vec<SkillEmbedding>>(EMBEDDINGS_CACHE_KEY)
            .await?
        {
            Some(embeddings) => {
                debug!(count = embeddings.len(), "Loaded embeddings from cache");
                Ok(embeddings)
            }
            None => {
                debug!("No cached embeddings, reading bundled dataset");
                self.try_load_from_csv().await
            }
        }
    }

    /// Loads the bundled dataset, replacing the in-memory set
    pub async fn load_from_csv(&self) -> Vec<SkillEmbedding> {
        match self.try_load_from_csv().await {
            Ok(embeddings) => embeddings,
            Err(e) => {
                error!(error = %e, "Failed to load bundled embeddings");
                Vec::new()
            }
        }
    }

    /// Loads the bundled dataset, replaces the in-memory set and writes it
    /// through to the persisted cache
    pub async fn try_load_from_csv(&self) -> Result<Vec<SkillEmbedding>, DomainError> {
        let embeddings = self.dataset.load().await?;
        warn_on_mixed_dimensions(&embeddings);

        self.state.write().await.embeddings = embeddings.clone();

        if let Err(e) = self.store.set_json(EMBEDDINGS_CACHE_KEY, &embeddings).await {
            warn!(error = %e, "Failed to cache bundled embeddings");
        }

        info!(count = embeddings.len(), "Loaded embeddings from bundled dataset");
        Ok(embeddings)
    }

    /// Pulls the full set from the remote store
    ///
    /// On failure the previous in-memory set is returned unchanged.
    pub async fn sync_from_cloud(&self) -> Vec<SkillEmbedding> {
        match self.try_sync_from_cloud().await {
            Ok(embeddings) => embeddings,
            Err(e @ DomainError::Configuration { .. }) => {
                debug!(error = %e, "Remote store unavailable, keeping local embeddings");
                self.current_embeddings().await
            }
            Err(e) => {
                error!(error = %e, "Remote sync failed, keeping local embeddings");
                self.current_embeddings().await
            }
        }
    }

    /// Pulls the full set from the remote store and replaces the in-memory set
    ///
    /// Only the timestamp and skill names are persisted, not the vectors.
    pub async fn try_sync_from_cloud(&self) -> Result<Vec<SkillEmbedding>, DomainError> {
        let rows = self.remote.fetch_all().await?;
        let embeddings: Vec<SkillEmbedding> = rows.into_iter().map(SkillEmbedding::from).collect();
        warn_on_mixed_dimensions(&embeddings);

        let now = self.clock.now_millis();
        {
            let mut state = self.state.write().await;
            state.embeddings = embeddings.clone();
            state.sync.last_sync_timestamp = Some(now);
        }

        self.persist_last_sync(now).await;

        if let Err(e) = self
            .store
            .set_json(SKILL_NAMES_KEY, &skill_names(&embeddings))
            .await
        {
            warn!(error = %e, "Failed to persist skill names");
        }

        info!(count = embeddings.len(), "Synced embeddings from remote store");
        Ok(embeddings)
    }

    /// Replaces the remote table with the local set
    ///
    /// Returns false when offline or on any failure.
    pub async fn upload_to_cloud(&self) -> bool {
        match self.try_upload_to_cloud().await {
            Ok(report) => {
                info!(
                    uploaded = report.uploaded,
                    cleared_remote = report.cleared_remote,
                    "Uploaded embeddings to remote store"
                );
                true
            }
            Err(DomainError::Offline { .. }) => {
                warn!("Skipping upload while offline");
                false
            }
            Err(e) => {
                error!(error = %e, "Failed to upload embeddings");
                false
            }
        }
    }

    /// Replaces the remote table with the local set
    ///
    /// A permission-denied delete is tolerated: the upsert is keyed by skill
    /// name, so rows are still replaced one by one.
    pub async fn try_upload_to_cloud(&self) -> Result<UploadReport, DomainError> {
        self.initialize().await;

        if self.offline_mode().await {
            return Err(DomainError::offline("Upload is disabled in offline mode"));
        }

        if self.state.read().await.embeddings.is_empty() {
            let loaded = self.load_cached_embeddings().await;
            self.state.write().await.embeddings = loaded;
        }

        let rows: Vec<RemoteEmbeddingRow> = self
            .state
            .read()
            .await
            .embeddings
            .iter()
            .map(RemoteEmbeddingRow::from)
            .collect();

        if rows.is_empty() {
            return Err(DomainError::validation("No embeddings loaded to upload"));
        }

        self.remote.ensure_session().await?;

        let cleared_remote = match self.remote.delete_all().await {
            Ok(()) => true,
            Err(e) if e.is_permission_denied() => {
                warn!(error = %e, "Not allowed to clear remote embeddings, upserting over them");
                false
            }
            Err(e) => return Err(e),
        };

        let uploaded = rows.len();
        self.remote.upsert(rows).await?;

        let now = self.clock.now_millis();
        self.state.write().await.sync.last_sync_timestamp = Some(now);
        self.persist_last_sync(now).await;

        Ok(UploadReport {
            uploaded,
            cleared_remote,
        })
    }

    async fn current_embeddings(&self) -> Vec<SkillEmbedding> {
        self.state.read().await.embeddings.clone()
    }

    async fn persist_last_sync(&self, now: i64) {
        if let Err(e) = self.store.set_raw(LAST_SYNC_KEY, &now.to_string()).await {
            warn!(error = %e, "Failed to persist last sync time");
        }
    }
}

fn warn_on_mixed_dimensions(embeddings: &[SkillEmbedding]) {
    if !embeddings.is_empty() && embedding_dimensions(embeddings).is_none() {
        warn!(
            count = embeddings.len(),
            "Embedding set has inconsistent vector dimensions"
        );
    }
}
