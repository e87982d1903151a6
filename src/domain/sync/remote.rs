//! Remote embedding store trait and row shape

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::embedding::SkillEmbedding;
use crate::domain::DomainError;

/// Row shape of the remote embeddings table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEmbeddingRow {
    pub skill_name: String,
    pub embedding_vector: Vec<f64>,
}

impl From<SkillEmbedding> for RemoteEmbeddingRow {
    fn from(embedding: SkillEmbedding) -> Self {
        let (skill_name, embedding_vector) = embedding.into_parts();
        Self {
            skill_name,
            embedding_vector,
        }
    }
}

impl From<&SkillEmbedding> for RemoteEmbeddingRow {
    fn from(embedding: &SkillEmbedding) -> Self {
        Self {
            skill_name: embedding.skill_name().to_string(),
            embedding_vector: embedding.vector().to_vec(),
        }
    }
}

impl From<RemoteEmbeddingRow> for SkillEmbedding {
    fn from(row: RemoteEmbeddingRow) -> Self {
        SkillEmbedding::new(row.skill_name, row.embedding_vector)
    }
}

/// Remote data service holding the authoritative embedding table
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteEmbeddingStore: Send + Sync {
    /// Fetches every row ordered by skill name ascending
    async fn fetch_all(&self) -> Result<Vec<RemoteEmbeddingRow>, DomainError>;

    /// Deletes every row
    ///
    /// Stores that forbid bulk deletes return [`DomainError::PermissionDenied`].
    async fn delete_all(&self) -> Result<(), DomainError>;

    /// Inserts rows, replacing existing rows with the same skill name
    async fn upsert(&self, rows: Vec<RemoteEmbeddingRow>) -> Result<(), DomainError>;

    /// Establishes an anonymous session unless one already exists
    async fn ensure_session(&self) -> Result<(), DomainError>;

    /// Name of the backend, used in logs
    fn store_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_from_embedding() {
        let row = RemoteEmbeddingRow::from(SkillEmbedding::new("Sneak", vec![0.1, 0.2]));

        assert_eq!(row.skill_name, "Sneak");
        assert_eq!(row.embedding_vector, vec![0.1, 0.2]);
    }

    #[test]
    fn test_embedding_from_row() {
        let row: RemoteEmbeddingRow = serde_json::from_value(serde_json::json!({
            "skill_name": "Fireball",
            "embedding_vector": [0.5, 0.25]
        }))
        .unwrap();

        let embedding = SkillEmbedding::from(row);
        assert_eq!(embedding.skill_name(), "Fireball");
        assert_eq!(embedding.vector(), &[0.5, 0.25]);
    }
}
