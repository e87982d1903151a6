//! Redis key-value store implementation

use std::fmt;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::key_value::KeyValueStore;
use crate::domain::DomainError;

/// Configuration for the Redis key-value store
#[derive(Debug, Clone)]
pub struct RedisKeyValueStoreConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
}

impl Default for RedisKeyValueStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
        }
    }
}

impl RedisKeyValueStoreConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

/// Key-value store kept in Redis without expiry
#[derive(Clone)]
pub struct RedisKeyValueStore {
    connection: ConnectionManager,
    config: RedisKeyValueStoreConfig,
}

impl fmt::Debug for RedisKeyValueStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisKeyValueStore")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisKeyValueStore {
    /// Connects to Redis
    pub async fn new(config: RedisKeyValueStoreConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::storage(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    fn prefix_key(&self, key: &str) -> String {
        prefixed(self.config.key_prefix.as_deref(), key)
    }
}

fn prefixed(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, key),
        None => key.to_string(),
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        conn.get(&prefixed_key)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get key '{}': {}", key, e)))
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let _: () = conn
            .set(&prefixed_key, value)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let deleted: i32 = conn.del(&prefixed_key).await.map_err(|e| {
            DomainError::storage(format!("Failed to delete key '{}': {}", key, e))
        })?;

        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        conn.exists(&prefixed_key).await.map_err(|e| {
            DomainError::storage(format!("Failed to check existence of key '{}': {}", key, e))
        })
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: the ignored tests require a running Redis instance
    // Run with: cargo test -- --ignored

    fn get_test_config() -> RedisKeyValueStoreConfig {
        RedisKeyValueStoreConfig::new("redis://127.0.0.1:6379").with_key_prefix("test")
    }

    #[test]
    fn test_prefixed_key() {
        assert_eq!(prefixed(Some("app"), "last_sync"), "app:last_sync");
        assert_eq!(prefixed(None, "last_sync"), "last_sync");
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_set_and_get() {
        let store = RedisKeyValueStore::new(get_test_config()).await.unwrap();

        store.set_raw("key1", "value1").await.unwrap();

        let result = store.get_raw("key1").await.unwrap();
        assert_eq!(result, Some("value1".to_string()));

        // Cleanup
        store.delete("key1").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_delete() {
        let store = RedisKeyValueStore::new(get_test_config()).await.unwrap();

        store.set_raw("key1", "value1").await.unwrap();

        assert!(store.delete("key1").await.unwrap());
        assert!(store.get_raw("key1").await.unwrap().is_none());
    }
}
