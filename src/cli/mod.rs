//! CLI module for the skill embedding store
//!
//! Provides subcommands for inspecting and maintaining the embedding set:
//! - `status`: offline flag, last sync and loaded set summary
//! - `list` / `lookup`: read embeddings (may trigger a sync when stale)
//! - `sync` / `upload`: pull from or push to the remote table
//! - `offline`: toggle offline mode

pub mod embeddings;
pub mod offline;
pub mod remote;
pub mod status;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::services::EmbeddingSyncService;

/// Skill embedding store with offline cache and remote sync
#[derive(Parser)]
#[command(name = "skill-embeddings")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show offline mode, last sync time and the loaded set
    Status,

    /// List skill names with their dimensions
    List,

    /// Print one skill's embedding as JSON
    Lookup(embeddings::LookupArgs),

    /// Pull the full set from the remote table
    Sync,

    /// Replace the remote table with the local set
    Upload,

    /// Turn offline mode on or off
    Offline(offline::OfflineArgs),
}

/// Loads configuration, installs logging and builds the service
pub(crate) async fn bootstrap() -> anyhow::Result<Arc<EmbeddingSyncService>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    crate::create_embedding_service_with_config(&config).await
}

/// Formats epoch millis as RFC 3339, or "never"
pub(crate) fn format_timestamp(millis: Option<i64>) -> String {
    millis
        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(None), "never");
        assert_eq!(format_timestamp(Some(0)), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_lookup() {
        let cli = Cli::try_parse_from(["skill-embeddings", "lookup", "Sneak"]).unwrap();

        match cli.command {
            Command::Lookup(args) => assert_eq!(args.skill, "Sneak"),
            _ => panic!("expected lookup"),
        }
    }

    #[test]
    fn test_parse_offline_switch() {
        let cli = Cli::try_parse_from(["skill-embeddings", "offline", "on"]).unwrap();

        match cli.command {
            Command::Offline(args) => assert!(args.state.is_offline()),
            _ => panic!("expected offline"),
        }

        assert!(Cli::try_parse_from(["skill-embeddings", "offline", "maybe"]).is_err());
    }
}
