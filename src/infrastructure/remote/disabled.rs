//! Remote store used when no remote is configured

use async_trait::async_trait;

use crate::domain::sync::{RemoteEmbeddingRow, RemoteEmbeddingStore};
use crate::domain::DomainError;

/// Remote store that refuses every operation
///
/// Every operation fails with a configuration error.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRemoteStore;

impl DisabledRemoteStore {
    fn error() -> DomainError {
        DomainError::configuration("Remote embedding store is not configured")
    }
}

#[async_trait]
impl RemoteEmbeddingStore for DisabledRemoteStore {
    async fn fetch_all(&self) -> Result<Vec<RemoteEmbeddingRow>, DomainError> {
        Err(Self::error())
    }

    async fn delete_all(&self) -> Result<(), DomainError> {
        Err(Self::error())
    }

    async fn upsert(&self, _rows: Vec<RemoteEmbeddingRow>) -> Result<(), DomainError> {
        Err(Self::error())
    }

    async fn ensure_session(&self) -> Result<(), DomainError> {
        Err(Self::error())
    }

    fn store_name(&self) -> &'static str {
        "disabled"
    }
}
