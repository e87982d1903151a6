//! Sync state, persisted keys and staleness policy

use std::time::Duration;

/// Persisted key for the last successful remote pull (epoch millis)
pub const LAST_SYNC_KEY: &str = "skill_embeddings:last_sync";
/// Persisted key for the offline mode preference
pub const OFFLINE_MODE_KEY: &str = "skill_embeddings:offline_mode";
/// Persisted key for the full embedding cache blob
pub const EMBEDDINGS_CACHE_KEY: &str = "skill_embeddings:cache";
/// Persisted key for the skill names of the last remote pull
pub const SKILL_NAMES_KEY: &str = "skill_embeddings:skill_names";

/// Age after which synced data is eligible for refresh
pub const STALENESS_THRESHOLD: Duration = Duration::from_secs(60 * 60);

/// Sync bookkeeping held by the embedding service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncState {
    /// Epoch millis of the last successful remote pull or upload
    pub last_sync_timestamp: Option<i64>,
    /// Suppresses remote pulls when set
    pub offline_mode: bool,
}

impl SyncState {
    /// Whether a remote pull is due at `now_millis`
    ///
    /// Never-synced state is always stale.
    pub fn is_stale(&self, now_millis: i64) -> bool {
        match self.last_sync_timestamp {
            Some(last) => now_millis.saturating_sub(last) > STALENESS_THRESHOLD.as_millis() as i64,
            None => true,
        }
    }

    /// Whether `get_embeddings` should pull from the remote store
    pub fn should_sync(&self, now_millis: i64) -> bool {
        !self.offline_mode && self.is_stale(now_millis)
    }
}

/// Decodes a persisted timestamp value
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Decodes a persisted boolean flag, anything but `"true"` is false
pub fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}
