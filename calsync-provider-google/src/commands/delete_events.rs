use anyhow::{Context, Result};
use calsync_core::Event;
use calsync_core::remote::protocol::DeleteEvents;
use google_calendar::types::SendUpdates;

/// Delete each event by id. An event Google already considers gone counts as
/// deleted; other failures are reported on stderr and left out of the result.
pub async fn handle(params: serde_json::Value) -> Result<Vec<Event>> {
    let cmd: DeleteEvents = serde_json::from_value(params).context("Invalid params")?;
    let (session, client) = super::authed_client(&cmd.remote_config).await?;

    let mut deleted = Vec::with_capacity(cmd.events.len());

    for event in &cmd.events {
        let Some(event_id) = event.id.as_deref() else {
            eprintln!("Cannot delete event '{}' without an id", event);
            continue;
        };

        let result = client
            .events()
            .delete(&cmd.calendar_id, event_id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => deleted.push(event.clone()),
            Err(e) if is_gone(&e.to_string()) => deleted.push(event.clone()),
            Err(e) => {
                if let Some(rejected) = session.check_rejected(&e) {
                    return Err(rejected.into());
                }
                eprintln!("Failed to delete event {}: {}", event_id, e);
            }
        }
    }

    Ok(deleted)
}

fn is_gone(message: &str) -> bool {
    message.contains("410") || message.contains("Gone")
}
