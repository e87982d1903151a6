//! Skill embedding domain models and traits

mod dataset;
mod entity;

pub use dataset::EmbeddingDataset;
pub use entity::{embedding_dimensions, find_by_skill, skill_names, SkillEmbedding};

#[cfg(test)]
pub use dataset::MockEmbeddingDataset;
