pub mod auth;
pub mod config;
pub mod status;
pub mod sync;

use std::time::Duration;

use anyhow::Result;
use calsync_core::Reconciler;
use calsync_core::config::CalsyncConfig;
use calsync_core::remote::ProviderClient;
use calsync_core::retry::{RetryPolicy, RetryingClient};

pub type RemoteClient = RetryingClient<ProviderClient>;

/// The provider client for `[remote]`, retried per `[sync]`.
pub fn remote_client(config: &CalsyncConfig) -> RemoteClient {
    let policy = RetryPolicy::new(
        config.sync.retries,
        Duration::from_millis(config.sync.retry_delay_ms),
    );

    RetryingClient::new(ProviderClient::from(&config.remote), policy)
}

pub fn reconciler(config: &CalsyncConfig) -> Result<Reconciler<RemoteClient>> {
    let sync_config = config.sync_config()?;
    Ok(Reconciler::new(remote_client(config), sync_config))
}
