//! Offline command - toggles offline mode

use clap::{Args, ValueEnum};

use super::bootstrap;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OfflineState {
    On,
    Off,
}

impl OfflineState {
    pub fn is_offline(self) -> bool {
        matches!(self, OfflineState::On)
    }
}

/// Arguments for the offline command
#[derive(Args, Clone)]
pub struct OfflineArgs {
    pub state: OfflineState,
}

pub async fn run(args: OfflineArgs) -> anyhow::Result<()> {
    let service = bootstrap().await?;
    service.set_offline_mode(args.state.is_offline()).await;

    println!("offline mode: {}", service.offline_mode().await);
    Ok(())
}
