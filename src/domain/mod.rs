//! Domain layer - Core entities and collaborator contracts

pub mod embedding;
pub mod error;
pub mod key_value;
pub mod sync;

pub use embedding::{EmbeddingDataset, SkillEmbedding};
pub use error::DomainError;
pub use key_value::{KeyValueStore, KeyValueStoreExt};
pub use sync::{Clock, RemoteEmbeddingRow, RemoteEmbeddingStore, SyncState, SystemClock};
