use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::key_value::{KeyValueStoreConfig, KeyValueStoreType};
use crate::infrastructure::remote::RemoteStoreConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub dataset: DatasetConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Key-value store holding the cache and sync metadata
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// `in_memory`, `file` or `redis`
    pub backend: String,
    pub path: String,
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    pub max_capacity: u64,
}

/// Bundled embedding dataset
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: String,
}

/// Remote embedding table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub table: String,
    pub timeout_secs: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: KeyValueStoreType::default().to_string(),
            path: "data/store.json".to_string(),
            redis_url: None,
            key_prefix: None,
            max_capacity: 10_000,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: "assets/skill_embeddings.csv".to_string(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: "skill_embeddings".to_string(),
            timeout_secs: 30,
        }
    }
}

impl StoreConfig {
    /// Resolves the section into a factory configuration
    pub fn to_store_config(&self) -> Result<KeyValueStoreConfig, crate::domain::DomainError> {
        let store_type: KeyValueStoreType = self.backend.parse()?;

        Ok(KeyValueStoreConfig {
            store_type,
            path: self.path.clone().into(),
            redis_url: self.redis_url.clone(),
            key_prefix: self.key_prefix.clone(),
            max_capacity: Some(self.max_capacity),
        })
    }
}

impl RemoteConfig {
    /// Resolves the section into a factory configuration
    ///
    /// Blank values count as unset so an empty env var disables the store.
    pub fn to_remote_config(&self) -> RemoteStoreConfig {
        RemoteStoreConfig {
            url: non_blank(&self.url),
            anon_key: non_blank(&self.anon_key),
            table: self.table.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
