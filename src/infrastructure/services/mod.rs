//! Infrastructure services

mod embedding_sync_service;

pub use embedding_sync_service::{EmbeddingSyncService, SyncStatus, UploadReport};
