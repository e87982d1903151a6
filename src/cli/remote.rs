//! Remote commands - sync and upload

use anyhow::bail;

use super::{bootstrap, format_timestamp};

/// Forces a pull from the remote table
pub async fn sync() -> anyhow::Result<()> {
    let service = bootstrap().await?;
    service.initialize().await;

    if service.offline_mode().await {
        bail!("Offline mode is on; run `skill-embeddings offline off` first");
    }

    let embeddings = service.try_sync_from_cloud().await?;
    println!(
        "Synced {} embeddings at {}",
        embeddings.len(),
        format_timestamp(service.last_sync_time().await)
    );

    Ok(())
}

/// Pushes the local set to the remote table
pub async fn upload() -> anyhow::Result<()> {
    let service = bootstrap().await?;

    if !service.upload_to_cloud().await {
        bail!("Upload failed; see log output for details");
    }

    println!("Upload complete");
    Ok(())
}
