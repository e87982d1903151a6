use clap::Parser;
use skill_embedding_sync::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Status => cli::status::run().await,
        Command::List => cli::embeddings::list().await,
        Command::Lookup(args) => cli::embeddings::lookup(args).await,
        Command::Sync => cli::remote::sync().await,
        Command::Upload => cli::remote::upload().await,
        Command::Offline(args) => cli::offline::run(args).await,
    }
}
