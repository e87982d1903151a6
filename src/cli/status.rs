//! Status command - prints the current service state

use super::{bootstrap, format_timestamp};

pub async fn run() -> anyhow::Result<()> {
    let service = bootstrap().await?;
    let status = service.status().await;

    println!("offline mode:  {}", status.offline_mode);
    println!("last sync:     {}", format_timestamp(status.last_sync_timestamp));
    println!("remote store:  {}", status.remote_store);
    println!("embeddings:    {}", status.embedding_count);
    println!(
        "dimensions:    {}",
        status
            .dimensions
            .map(|d| d.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    );

    Ok(())
}
