//! Key-value domain - Persisted string store abstraction

mod repository;

pub use repository::{KeyValueStore, KeyValueStoreExt};

#[cfg(test)]
pub use repository::mock::MockKeyValueStore;
