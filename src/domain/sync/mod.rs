//! Sync domain - State, clock and remote store contracts

mod clock;
mod remote;
mod state;

pub use clock::{Clock, SystemClock};
pub use remote::{RemoteEmbeddingRow, RemoteEmbeddingStore};
pub use state::{
    parse_flag, parse_timestamp, SyncState, EMBEDDINGS_CACHE_KEY, LAST_SYNC_KEY,
    OFFLINE_MODE_KEY, SKILL_NAMES_KEY, STALENESS_THRESHOLD,
};

#[cfg(test)]
pub use clock::mock::ManualClock;
#[cfg(test)]
pub use remote::MockRemoteEmbeddingStore;
