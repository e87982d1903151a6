//! In-memory key-value store using moka

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::key_value::KeyValueStore;
use crate::domain::DomainError;

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Process-local key-value store
///
/// Nothing survives a restart; intended for tests and ephemeral runs.
#[derive(Debug, Clone)]
pub struct InMemoryKeyValueStore {
    entries: MokaCache<String, String>,
}

impl InMemoryKeyValueStore {
    /// Creates a store with the default capacity
    pub fn new() -> Self {
        Self::with_max_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Creates a store holding at most `capacity` keys
    pub fn with_max_capacity(capacity: u64) -> Self {
        Self {
            entries: MokaCache::builder().max_capacity(capacity).build(),
        }
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.get(key).await)
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.entries.insert(key.to_string(), value.to_string()).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.entries.remove(key).await.is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.entries.contains_key(key))
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}
