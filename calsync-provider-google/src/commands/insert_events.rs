use anyhow::{Context, Result};
use calsync_core::Event;
use calsync_core::remote::protocol::InsertEvents;
use google_calendar::types::SendUpdates;

use crate::google_event::ToGoogle;

/// Insert each event on its own. Entries Google refuses are reported on
/// stderr and left out of the result.
pub async fn handle(params: serde_json::Value) -> Result<Vec<Event>> {
    let cmd: InsertEvents = serde_json::from_value(params).context("Invalid params")?;
    let (session, client) = super::authed_client(&cmd.remote_config).await?;

    let mut inserted = Vec::with_capacity(cmd.events.len());

    for event in &cmd.events {
        let google_event = event.to_google();

        let result = client
            .events()
            .insert(
                &cmd.calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await;

        match result {
            Ok(response) => {
                let mut stored = event.clone();
                stored.id = Some(response.body.id);
                inserted.push(stored);
            }
            Err(e) => {
                if let Some(rejected) = session.check_rejected(&e) {
                    return Err(rejected.into());
                }
                eprintln!("Failed to insert event '{}': {}", event, e);
            }
        }
    }

    Ok(inserted)
}
