//! Bundled CSV embedding dataset
//!
//! The file has a `Skill,Embedding` header followed by one row per skill:
//!
//! ```text
//! Skill,Embedding
//! Sneak,"0.1 0.2 0.3"
//! ```
//!
//! Rows are split on the first comma only, since the quoted embedding field
//! may itself contain commas.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::embedding::{EmbeddingDataset, SkillEmbedding};
use crate::domain::DomainError;

/// Header written to placeholder files
pub const CSV_HEADER: &str = "Skill,Embedding";

/// Embedding dataset read from a CSV file on disk
#[derive(Debug, Clone)]
pub struct CsvEmbeddingDataset {
    path: PathBuf,
}

impl CsvEmbeddingDataset {
    /// Creates a dataset reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the CSV file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates a header-only file when none exists yet
    ///
    /// Returns true when a placeholder was written.
    pub async fn ensure_exists(&self) -> Result<bool, DomainError> {
        if tokio::fs::try_exists(&self.path).await.map_err(|e| {
            DomainError::dataset(format!(
                "Failed to check dataset '{}': {}",
                self.path.display(),
                e
            ))
        })? {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::dataset(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        tokio::fs::write(&self.path, format!("{}\n", CSV_HEADER))
            .await
            .map_err(|e| {
                DomainError::dataset(format!(
                    "Failed to create placeholder dataset '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        info!(path = %self.path.display(), "Created placeholder embedding dataset");
        Ok(true)
    }
}

#[async_trait]
impl EmbeddingDataset for CsvEmbeddingDataset {
    async fn load(&self) -> Result<Vec<SkillEmbedding>, DomainError> {
        self.ensure_exists().await?;

        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::dataset(format!(
                "Failed to read dataset '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let embeddings = parse_embedding_csv(&contents);
        debug!(
            path = %self.path.display(),
            count = embeddings.len(),
            "Parsed embedding dataset"
        );

        Ok(embeddings)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parses dataset contents, skipping the header and malformed rows
pub fn parse_embedding_csv(contents: &str) -> Vec<SkillEmbedding> {
    contents
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| {
            let parsed = parse_row(line);

            if parsed.is_none() {
                warn!(line = index + 1, "Skipping malformed embedding row");
            }

            parsed
        })
        .collect()
}

fn parse_row(line: &str) -> Option<SkillEmbedding> {
    let (skill_name, raw_vector) = line.split_once(',')?;

    let skill_name = skill_name.trim();
    let raw_vector = raw_vector.replace('"', "");

    if skill_name.is_empty() || raw_vector.trim().is_empty() {
        return None;
    }

    // Commas inside the quoted field act as separators alongside whitespace
    let vector = raw_vector
        .split_whitespace()
        .map(|token| token.trim_matches(','))
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    Some(SkillEmbedding::new(skill_name, vector))
}
