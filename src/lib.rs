//! Skill Embedding Sync
//!
//! Keeps a named set of skill embedding vectors available to game logic:
//! - Persisted cache with a bundled CSV dataset as fallback
//! - Hourly whole-set refresh from a remote Supabase table
//! - Offline mode that suppresses all remote traffic
//! - Upload of the local set to the remote table

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use infrastructure::{
    dataset::CsvEmbeddingDataset,
    key_value::KeyValueStoreFactory,
    remote::RemoteStoreFactory,
    services::EmbeddingSyncService,
};
use domain::EmbeddingDataset;
use tracing::info;

/// Create the embedding service with default configuration
pub async fn create_embedding_service() -> anyhow::Result<Arc<EmbeddingSyncService>> {
    create_embedding_service_with_config(&AppConfig::default()).await
}

/// Create the embedding service with custom configuration
pub async fn create_embedding_service_with_config(
    config: &AppConfig,
) -> anyhow::Result<Arc<EmbeddingSyncService>> {
    let store_config = config.store.to_store_config()?;
    let store = KeyValueStoreFactory::new().create(&store_config).await?;
    info!(backend = store.backend_name(), "Key-value store ready");

    let dataset = Arc::new(CsvEmbeddingDataset::new(&config.dataset.path));
    info!(location = %dataset.location(), "Bundled dataset configured");

    let remote = RemoteStoreFactory::new().create(&config.remote.to_remote_config())?;

    Ok(Arc::new(EmbeddingSyncService::new(store, dataset, remote)))
}
