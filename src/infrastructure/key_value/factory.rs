//! Key-value store factory for runtime selection

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::key_value::KeyValueStore;
use crate::domain::DomainError;

use super::file::FileKeyValueStore;
use super::in_memory::InMemoryKeyValueStore;
use super::redis::{RedisKeyValueStore, RedisKeyValueStoreConfig};

const DEFAULT_STORE_PATH: &str = "data/store.json";

/// Supported key-value store types
#[derive(Debug, Clone, Default, PartialEq)]
pub enum KeyValueStoreType {
    /// Process-local moka store
    InMemory,
    /// JSON file on disk
    #[default]
    File,
    /// Redis
    Redis,
}

impl std::fmt::Display for KeyValueStoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyValueStoreType::InMemory => write!(f, "in_memory"),
            KeyValueStoreType::File => write!(f, "file"),
            KeyValueStoreType::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for KeyValueStoreType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(KeyValueStoreType::InMemory),
            "file" | "json" => Ok(KeyValueStoreType::File),
            "redis" => Ok(KeyValueStoreType::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown store type: {}. Valid types: in_memory, file, redis",
                s
            ))),
        }
    }
}

/// Configuration for key-value store factory
#[derive(Debug, Clone)]
pub struct KeyValueStoreConfig {
    /// Type of store to create
    pub store_type: KeyValueStoreType,
    /// Backing file (file store)
    pub path: PathBuf,
    /// Redis URL (required for Redis type)
    pub redis_url: Option<String>,
    /// Key prefix for namespacing (Redis only)
    pub key_prefix: Option<String>,
    /// Maximum number of keys (in-memory only)
    pub max_capacity: Option<u64>,
}

impl Default for KeyValueStoreConfig {
    fn default() -> Self {
        Self {
            store_type: KeyValueStoreType::File,
            path: PathBuf::from(DEFAULT_STORE_PATH),
            redis_url: None,
            key_prefix: None,
            max_capacity: None,
        }
    }
}

impl KeyValueStoreConfig {
    /// Creates a configuration for an in-memory store
    pub fn in_memory() -> Self {
        Self {
            store_type: KeyValueStoreType::InMemory,
            ..Default::default()
        }
    }

    /// Creates a configuration for a file store at `path`
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            store_type: KeyValueStoreType::File,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Creates a configuration for a Redis store
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            store_type: KeyValueStoreType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Sets the maximum capacity (in-memory only)
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }
}

/// Factory for creating key-value store instances
#[derive(Debug, Default)]
pub struct KeyValueStoreFactory;

impl KeyValueStoreFactory {
    /// Creates a new factory
    pub fn new() -> Self {
        Self
    }

    /// Creates a store based on configuration
    pub async fn create(
        &self,
        config: &KeyValueStoreConfig,
    ) -> Result<Arc<dyn KeyValueStore>, DomainError> {
        match config.store_type {
            KeyValueStoreType::InMemory => {
                let store = match config.max_capacity {
                    Some(capacity) => InMemoryKeyValueStore::with_max_capacity(capacity),
                    None => InMemoryKeyValueStore::new(),
                };
                Ok(Arc::new(store))
            }
            KeyValueStoreType::File => Ok(Arc::new(FileKeyValueStore::new(config.path.clone()))),
            KeyValueStoreType::Redis => {
                let url = config.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for Redis store type")
                })?;

                let mut redis_config = RedisKeyValueStoreConfig::new(url);

                if let Some(prefix) = &config.key_prefix {
                    redis_config = redis_config.with_key_prefix(prefix.clone());
                }

                let store = RedisKeyValueStore::new(redis_config).await?;
                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_type_from_str() {
        assert_eq!(
            "in_memory".parse::<KeyValueStoreType>().unwrap(),
            KeyValueStoreType::InMemory
        );
        assert_eq!(
            "memory".parse::<KeyValueStoreType>().unwrap(),
            KeyValueStoreType::InMemory
        );
        assert_eq!("file".parse::<KeyValueStoreType>().unwrap(), KeyValueStoreType::File);
        assert_eq!("REDIS".parse::<KeyValueStoreType>().unwrap(), KeyValueStoreType::Redis);
    }

    #[test]
    fn test_store_type_from_str_invalid() {
        assert!("sqlite".parse::<KeyValueStoreType>().is_err());
    }

    #[test]
    fn test_store_type_display() {
        assert_eq!(KeyValueStoreType::InMemory.to_string(), "in_memory");
        assert_eq!(KeyValueStoreType::File.to_string(), "file");
        assert_eq!(KeyValueStoreType::Redis.to_string(), "redis");
    }

    #[tokio::test]
    async fn test_factory_create_in_memory() {
        let factory = KeyValueStoreFactory::new();
        let store = factory
            .create(&KeyValueStoreConfig::in_memory().with_max_capacity(10))
            .await
            .unwrap();

        store.set_raw("key", "value").await.unwrap();
        assert_eq!(store.get_raw("key").await.unwrap(), Some("value".to_string()));
        assert_eq!(store.backend_name(), "in_memory");
    }

    #[tokio::test]
    async fn test_factory_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let factory = KeyValueStoreFactory::new();
        let store = factory
            .create(&KeyValueStoreConfig::file(dir.path().join("store.json")))
            .await
            .unwrap();

        assert_eq!(store.backend_name(), "file");
    }

    #[tokio::test]
    async fn test_factory_create_redis_missing_url() {
        let factory = KeyValueStoreFactory::new();
        let config = KeyValueStoreConfig {
            store_type: KeyValueStoreType::Redis,
            redis_url: None,
            ..Default::default()
        };

        let result = factory.create(&config).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
