use anyhow::{Context, Result};
use calsync_core::remote::protocol::ListEvents;
use calsync_core::{Event, EventQuery, EventStatus, SortOrder};
use chrono::{DateTime, Duration, Utc};
use google_calendar::types::OrderBy;

use crate::google_event::FromGoogle;

/// How far past `time_min` an open-ended listing reaches.
const OPEN_WINDOW_DAYS: i64 = 365;

pub async fn handle(params: serde_json::Value) -> Result<Vec<Event>> {
    let cmd: ListEvents = serde_json::from_value(params).context("Invalid params")?;
    let (session, client) = super::authed_client(&cmd.remote_config).await?;

    let query = cmd.query();
    let (time_min, time_max) = request_window(&query, Utc::now());

    // Recurring events are expanded so each occurrence is matched on its own
    let response = client
        .events()
        .list_all(
            &query.calendar_id,
            "",
            0,
            OrderBy::StartTime,
            &[],
            "", // search query
            &[],
            false,
            false,
            true,
            &time_max,
            &time_min,
            "",
            "",
        )
        .await
        .map_err(|e| match session.check_rejected(&e) {
            Some(rejected) => anyhow::Error::new(rejected),
            None => anyhow::Error::new(e),
        })
        .with_context(|| format!("Failed to fetch events from {}", query.calendar_id))?;

    let events = response
        .body
        .into_iter()
        .map(Event::from_google)
        .collect::<Result<Vec<_>>>()?;

    Ok(select(events, &query))
}

/// The `timeMin`/`timeMax` pair to send Google for `query`.
///
/// Google matches on `end > timeMin` and `start < timeMax`. `select` applies
/// the exact start bounds afterwards. A query with no upper bound is closed
/// `OPEN_WINDOW_DAYS` past its lower bound so paging stops.
fn request_window(query: &EventQuery, now: DateTime<Utc>) -> (String, String) {
    let time_min = query.min_start;
    let time_max = match query.max_start {
        Some(max) => max + Duration::seconds(1),
        None => time_min.unwrap_or(now) + Duration::days(OPEN_WINDOW_DAYS),
    };

    (
        time_min.map(|t| t.to_rfc3339()).unwrap_or_default(),
        time_max.to_rfc3339(),
    )
}

fn select(events: Vec<Event>, query: &EventQuery) -> Vec<Event> {
    let mut events: Vec<Event> = events
        .into_iter()
        .filter(|e| e.status != EventStatus::Cancelled)
        .filter(|e| query.contains_start(e.start.to_utc()))
        .collect();

    events.sort_by_key(|e| e.start.to_utc());
    if query.order == SortOrder::Descending {
        events.reverse();
    }

    events.truncate(query.max_results);
    events
}
