use anyhow::Result;
use calsync_core::config::CalsyncConfig;
use calsync_core::remote::ProviderClient;

pub async fn run(config: &CalsyncConfig) -> Result<()> {
    let client = ProviderClient::from(&config.remote);

    println!("Authenticating with {}...", client.provider().name());

    // Provider handles the full OAuth flow and stores credentials/tokens
    let account = client.authenticate().await?;

    println!("Authenticated as: {account}\n");
    println!("Run `calsync status` to preview a sync.");

    Ok(())
}
