//! Remote store factory for runtime selection

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::domain::sync::RemoteEmbeddingStore;
use crate::domain::DomainError;

use super::disabled::DisabledRemoteStore;
use super::http_client::HttpClient;
use super::supabase::{SupabaseConfig, SupabaseEmbeddingStore};

/// Configuration for remote store factory
#[derive(Debug, Clone)]
pub struct RemoteStoreConfig {
    /// Project URL; `None` disables the remote store
    pub url: Option<String>,
    /// Public anonymous API key
    pub anon_key: Option<String>,
    /// Table holding the embeddings
    pub table: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for RemoteStoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: "skill_embeddings".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RemoteStoreConfig {
    /// Creates a configuration for a Supabase project
    pub fn supabase(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            anon_key: Some(anon_key.into()),
            ..Default::default()
        }
    }

    /// Sets the table name
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Sets the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Factory for creating remote store instances
#[derive(Debug, Default)]
pub struct RemoteStoreFactory;

impl RemoteStoreFactory {
    /// Creates a new factory
    pub fn new() -> Self {
        Self
    }

    /// Creates a remote store based on configuration
    pub fn create(
        &self,
        config: &RemoteStoreConfig,
    ) -> Result<Arc<dyn RemoteEmbeddingStore>, DomainError> {
        match (&config.url, &config.anon_key) {
            (Some(url), Some(anon_key)) => {
                let client = HttpClient::with_timeout(config.timeout)?;
                let supabase =
                    SupabaseConfig::new(url.clone(), anon_key.clone()).with_table(&config.table);

                info!(url = %supabase.url, table = %supabase.table, "Using Supabase embedding store");
                Ok(Arc::new(SupabaseEmbeddingStore::new(client, supabase)))
            }
            (None, None) => {
                info!("No remote embedding store configured, running local-only");
                Ok(Arc::new(DisabledRemoteStore))
            }
            (Some(_), None) => Err(DomainError::configuration(
                "Remote anon key is required when a remote URL is set",
            )),
            (None, Some(_)) => Err(DomainError::configuration(
                "Remote URL is required when an anon key is set",
            )),
        }
    }
}
