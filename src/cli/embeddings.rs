//! Read commands - list and lookup

use anyhow::bail;
use clap::Args;

use super::bootstrap;

/// Arguments for the lookup command
#[derive(Args, Clone)]
pub struct LookupArgs {
    /// Exact skill name
    pub skill: String,
}

/// Prints every skill name with its vector length
pub async fn list() -> anyhow::Result<()> {
    let service = bootstrap().await?;

    for embedding in service.get_embeddings().await {
        println!("{}\t{}", embedding.skill_name(), embedding.dimensions());
    }

    Ok(())
}

/// Prints one embedding as JSON; fails when the skill is unknown
pub async fn lookup(args: LookupArgs) -> anyhow::Result<()> {
    let service = bootstrap().await?;

    let Some(embedding) = service.get_embedding_by_skill(&args.skill).await else {
        bail!("No embedding for skill '{}'", args.skill);
    };

    println!("{}", serde_json::to_string_pretty(&embedding)?);
    Ok(())
}
