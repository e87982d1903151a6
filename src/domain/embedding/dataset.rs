//! Bundled embedding dataset trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

use super::SkillEmbedding;

/// Read-only source of embeddings shipped with the application
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmbeddingDataset: Send + Sync {
    /// Reads every valid row of the dataset in file order
    async fn load(&self) -> Result<Vec<SkillEmbedding>, DomainError>;

    /// Human readable location of the dataset, used in logs
    fn location(&self) -> String;
}
