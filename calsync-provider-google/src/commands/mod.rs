pub mod authenticate;
pub mod delete_events;
pub mod insert_events;
pub mod list_events;

use anyhow::Result;
use google_calendar::Client;

use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

/// A refreshed session and API client for the account in `remote_config`.
pub async fn authed_client(
    remote_config: &serde_json::Map<String, serde_json::Value>,
) -> Result<(Session, Client)> {
    let config = GoogleRemoteConfig::try_from(remote_config)?;
    let session = Session::load_valid(&config.google_account).await?;
    let client = session.client()?;

    Ok((session, client))
}
