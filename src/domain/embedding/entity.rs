//! Skill embedding entity and set helpers

use serde::{Deserialize, Serialize};

/// A named skill and its precomputed embedding vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEmbedding {
    /// Unique skill name (lookup key)
    skill_name: String,
    /// The embedding vector
    vector: Vec<f64>,
}

impl SkillEmbedding {
    /// Create a new skill embedding
    pub fn new(skill_name: impl Into<String>, vector: Vec<f64>) -> Self {
        Self {
            skill_name: skill_name.into(),
            vector,
        }
    }

    /// Get the skill name
    pub fn skill_name(&self) -> &str {
        &self.skill_name
    }

    /// Get the embedding vector
    pub fn vector(&self) -> &[f64] {
        &self.vector
    }

    /// Get the embedding dimensions
    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }

    /// Consume and return the name and vector
    pub fn into_parts(self) -> (String, Vec<f64>) {
        (self.skill_name, self.vector)
    }
}

/// Returns the shared dimensionality of a set, or `None` when the set is
/// empty or its entries disagree.
pub fn embedding_dimensions(embeddings: &[SkillEmbedding]) -> Option<usize> {
    let first = embeddings.first()?.dimensions();

    embeddings
        .iter()
        .all(|e| e.dimensions() == first)
        .then_some(first)
}

/// Skill names in set order
pub fn skill_names(embeddings: &[SkillEmbedding]) -> Vec<String> {
    embeddings.iter().map(|e| e.skill_name.clone()).collect()
}

/// First entry whose name matches exactly
pub fn find_by_skill<'a>(
    embeddings: &'a [SkillEmbedding],
    skill_name: &str,
) -> Option<&'a SkillEmbedding> {
    embeddings.iter().find(|e| e.skill_name == skill_name)
}
