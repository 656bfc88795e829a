//! End-to-end sync runs against an in-memory calendar service.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use calsync_core::config::SyncConfig;
use calsync_core::matcher::is_equivalent;
use calsync_core::{
    CalSyncError, CalSyncResult, CalendarClient, CopyCriterion, CriterionField, Event, EventQuery,
    EventTime, Reconciler,
};
use chrono::{DateTime, Duration, DurationRound, Utc};
use pretty_assertions::assert_eq;

const SOURCE: &str = "team@group.calendar.google.com";
const TARGET: &str = "primary";

/// Calendars held in memory, keyed by calendar id.
#[derive(Default)]
struct FakeCalendars {
    calendars: Mutex<HashMap<String, Vec<Event>>>,
    next_id: Mutex<usize>,
    /// Accept at most this many events per insert batch
    insert_limit: Option<usize>,
    /// Queries against this calendar fail
    unreachable: Option<String>,
    reject_auth: bool,
    queries: Mutex<Vec<EventQuery>>,
    write_batches: Mutex<usize>,
}

impl FakeCalendars {
    fn with(source: Vec<Event>, target: Vec<Event>) -> Self {
        let fake = FakeCalendars::default();
        for event in source {
            fake.add(SOURCE, event);
        }
        for event in target {
            fake.add(TARGET, event);
        }
        fake
    }

    fn add(&self, calendar_id: &str, mut event: Event) {
        event.id = Some(self.fresh_id());
        self.calendars
            .lock()
            .unwrap()
            .entry(calendar_id.to_string())
            .or_default()
            .push(event);
    }

    fn remove_where(&self, calendar_id: &str, title: &str) {
        if let Some(events) = self.calendars.lock().unwrap().get_mut(calendar_id) {
            events.retain(|e| e.title.as_deref() != Some(title));
        }
    }

    fn events(&self, calendar_id: &str) -> Vec<Event> {
        self.calendars
            .lock()
            .unwrap()
            .get(calendar_id)
            .cloned()
            .unwrap_or_default()
    }

    fn write_batches(&self) -> usize {
        *self.write_batches.lock().unwrap()
    }

    fn fresh_id(&self) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("evt{next}")
    }

    fn check_auth(&self) -> CalSyncResult<()> {
        if self.reject_auth {
            return Err(CalSyncError::Authentication("token revoked".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarClient for FakeCalendars {
    async fn query_events(&self, query: &EventQuery) -> CalSyncResult<Vec<Event>> {
        self.check_auth()?;
        self.queries.lock().unwrap().push(query.clone());

        if self.unreachable.as_deref() == Some(query.calendar_id.as_str()) {
            return Err(CalSyncError::RemoteQuery {
                calendar: query.calendar_id.clone(),
                message: "connection reset".into(),
            });
        }

        let mut events: Vec<Event> = self
            .events(&query.calendar_id)
            .into_iter()
            .filter(|e| query.contains_start(e.start.to_utc()))
            .collect();
        events.sort_by_key(|e| e.start.to_utc());
        events.truncate(query.max_results);

        Ok(events)
    }

    async fn batch_insert(&self, calendar_id: &str, events: &[Event]) -> CalSyncResult<Vec<Event>> {
        self.check_auth()?;
        *self.write_batches.lock().unwrap() += 1;

        let accepted = events.len().min(self.insert_limit.unwrap_or(usize::MAX));
        let mut stored = Vec::new();
        for event in &events[..accepted] {
            assert!(event.id.is_none(), "copies must not carry a server id");
            self.add(calendar_id, event.clone());
            stored.push(self.events(calendar_id).last().cloned().unwrap());
        }

        Ok(stored)
    }

    async fn batch_delete(&self, calendar_id: &str, events: &[Event]) -> CalSyncResult<Vec<Event>> {
        self.check_auth()?;
        *self.write_batches.lock().unwrap() += 1;

        let mut calendars = self.calendars.lock().unwrap();
        let stored = calendars.entry(calendar_id.to_string()).or_default();

        let mut deleted = Vec::new();
        for event in events {
            if let Some(pos) = stored.iter().position(|e| e.id.is_some() && e.id == event.id) {
                deleted.push(stored.remove(pos));
            }
        }

        Ok(deleted)
    }
}

fn hours_from_now(hours: i64) -> EventTime {
    let now = Utc::now().duration_trunc(Duration::hours(1)).unwrap();
    EventTime::DateTime(now + Duration::hours(hours))
}

fn event(title: &str, start_in_hours: i64) -> Event {
    Event::new(title, hours_from_now(start_in_hours), hours_from_now(start_in_hours + 1))
}

fn config(field: CriterionField, pattern: &str) -> SyncConfig {
    SyncConfig::new(SOURCE, TARGET, CopyCriterion::new(field, pattern).unwrap())
}

fn title_sync() -> SyncConfig {
    config(CriterionField::Title, "Sync")
}

fn count_equivalent(events: &[Event], wanted: &Event) -> usize {
    events.iter().filter(|e| is_equivalent(e, wanted)).count()
}

#[tokio::test]
async fn test_copies_matching_event_to_empty_target() {
    let team_sync = event("Team Sync", 24);
    let fake = FakeCalendars::with(vec![team_sync.clone()], vec![]);
    let reconciler = Reconciler::new(fake, title_sync());

    let result = reconciler.sync().await.unwrap();

    assert_eq!(result.copied(), 1);
    assert_eq!(result.deleted(), 0);

    let target = reconciler.client().events(TARGET);
    assert_eq!(target.len(), 1);
    assert!(is_equivalent(&target[0], &team_sync));
}

#[tokio::test]
async fn test_deletes_orphan_matching_criterion() {
    let fake = FakeCalendars::with(vec![], vec![event("Old Sync", 48)]);
    let reconciler = Reconciler::new(fake, title_sync());

    let result = reconciler.sync().await.unwrap();

    assert_eq!(result.copied(), 0);
    assert_eq!(result.deleted(), 1);
    assert!(reconciler.client().events(TARGET).is_empty());
}

#[tokio::test]
async fn test_non_matching_target_events_are_left_alone() {
    let dentist = event("Dentist", 30);
    let fake = FakeCalendars::with(vec![], vec![dentist.clone()]);
    let reconciler = Reconciler::new(fake, title_sync());

    let result = reconciler.sync().await.unwrap();

    assert!(result.is_noop());
    assert_eq!(reconciler.client().write_batches(), 0);
    assert_eq!(count_equivalent(&reconciler.client().events(TARGET), &dentist), 1);
}

#[tokio::test]
async fn test_events_without_criterion_field_never_copy() {
    let mut no_location = event("Planning", 12);
    no_location.location = None;
    let mut empty_location = event("Retro", 14);
    empty_location.location = Some(String::new());

    let fake = FakeCalendars::with(vec![no_location, empty_location], vec![]);
    let reconciler = Reconciler::new(fake, config(CriterionField::Location, ".*"));

    let result = reconciler.sync().await.unwrap();

    assert_eq!(result.copied(), 0);
    assert!(reconciler.client().events(TARGET).is_empty());
}

#[tokio::test]
async fn test_partial_batch_is_counted_not_raised() {
    let fake = FakeCalendars {
        insert_limit: Some(2),
        ..FakeCalendars::with(
            vec![event("Sync A", 10), event("Sync B", 20), event("Sync C", 30)],
            vec![],
        )
    };
    let reconciler = Reconciler::new(fake, title_sync());

    let result = reconciler.sync().await.unwrap();

    assert_eq!(result.copy.staged, 3);
    assert_eq!(result.copied(), 2);
    assert!(result.is_partial());
    assert_eq!(reconciler.client().events(TARGET).len(), 2);
}

#[tokio::test]
async fn test_second_run_is_a_noop() {
    let fake = FakeCalendars::with(
        vec![event("Team Sync", 5), event("Lunch", 6), event("Design Sync", 7)],
        vec![event("Stale Sync", 8), event("Gym", 9)],
    );
    let reconciler = Reconciler::new(fake, title_sync());

    let first = reconciler.sync().await.unwrap();
    assert_eq!(first.copied(), 2);
    assert_eq!(first.deleted(), 1);

    let second = reconciler.sync().await.unwrap();
    assert_eq!(second.copied(), 0);
    assert_eq!(second.deleted(), 0);
    assert!(second.is_noop());

    let target = reconciler.client().events(TARGET);
    let mut titles: Vec<_> = target.iter().filter_map(|e| e.title.clone()).collect();
    titles.sort();
    assert_eq!(titles, vec!["Design Sync", "Gym", "Team Sync"]);
}

#[tokio::test]
async fn test_copy_removed_from_source_is_deleted_on_next_run() {
    let fake = FakeCalendars::with(vec![event("Team Sync", 5), event("Board Sync", 6)], vec![]);
    let reconciler = Reconciler::new(fake, title_sync());

    assert_eq!(reconciler.sync().await.unwrap().copied(), 2);

    reconciler.client().remove_where(SOURCE, "Board Sync");

    let result = reconciler.sync().await.unwrap();
    assert_eq!(result.copied(), 0);
    assert_eq!(result.deleted(), 1);

    let target = reconciler.client().events(TARGET);
    assert_eq!(target.len(), 1);
    assert_eq!(target[0].title.as_deref(), Some("Team Sync"));
}

#[tokio::test]
async fn test_rescheduled_source_event_replaces_copy() {
    let fake = FakeCalendars::with(vec![event("Team Sync", 5)], vec![]);
    let reconciler = Reconciler::new(fake, title_sync());
    reconciler.sync().await.unwrap();

    let moved = event("Team Sync", 29);
    reconciler.client().remove_where(SOURCE, "Team Sync");
    reconciler.client().add(SOURCE, moved.clone());

    let result = reconciler.sync().await.unwrap();
    assert_eq!(result.copied(), 1);
    assert_eq!(result.deleted(), 1);

    let target = reconciler.client().events(TARGET);
    assert_eq!(target.len(), 1);
    assert_eq!(target[0].start, moved.start);
}

#[tokio::test]
async fn test_past_events_are_ignored() {
    let fake = FakeCalendars::with(vec![event("Team Sync", -48)], vec![event("Old Sync", -24)]);
    let reconciler = Reconciler::new(fake, title_sync());

    let result = reconciler.sync().await.unwrap();

    assert!(result.is_noop());
    assert_eq!(reconciler.client().events(TARGET).len(), 1);
}

#[tokio::test]
async fn test_queries_are_upcoming_ascending_and_capped() {
    let fake = FakeCalendars::with(vec![], vec![]);
    let reconciler = Reconciler::new(fake, title_sync().with_max_results(250));

    reconciler.sync().await.unwrap();

    let queries = reconciler.client().queries.lock().unwrap().clone();
    // Two phases, two calendars each.
    assert_eq!(queries.len(), 4);

    let now: DateTime<Utc> = Utc::now();
    for query in &queries {
        assert_eq!(query.max_results, 250);
        assert_eq!(query.order, calsync_core::SortOrder::Ascending);
        assert!(query.min_start.is_some_and(|min| min <= now));
        assert!(query.max_start.is_none());
    }
    let calendars: Vec<_> = queries.iter().map(|q| q.calendar_id.as_str()).collect();
    assert_eq!(calendars, vec![SOURCE, TARGET, TARGET, SOURCE]);
}

#[tokio::test]
async fn test_existing_copy_past_a_full_target_listing_is_not_duplicated() {
    let team_sync = event("Team Sync", 100);
    let fake = FakeCalendars::with(
        vec![team_sync.clone()],
        vec![event("Gym", 10), event("Dentist", 20), team_sync.clone()],
    );
    let reconciler = Reconciler::new(fake, title_sync().with_max_results(2));

    for _ in 0..2 {
        let result = reconciler.sync().await.unwrap();
        assert_eq!(result.copied(), 0);
        assert_eq!(result.deleted(), 0);
    }

    let target = reconciler.client().events(TARGET);
    assert_eq!(count_equivalent(&target, &team_sync), 1);

    // The copy was confirmed with a lookup around its own start
    let queries = reconciler.client().queries.lock().unwrap().clone();
    assert!(queries.iter().any(|q| q.calendar_id == TARGET
        && q.min_start == Some(team_sync.start.to_utc())
        && q.max_start == Some(team_sync.end.to_utc())));
}

#[tokio::test]
async fn test_missing_copy_past_a_full_target_listing_is_copied_once() {
    let team_sync = event("Team Sync", 100);
    let fake = FakeCalendars::with(vec![team_sync.clone()], vec![event("Gym", 10), event("Dentist", 20)]);
    let reconciler = Reconciler::new(fake, title_sync().with_max_results(2));

    assert_eq!(reconciler.sync().await.unwrap().copied(), 1);
    assert_eq!(reconciler.sync().await.unwrap().copied(), 0);

    let target = reconciler.client().events(TARGET);
    assert_eq!(count_equivalent(&target, &team_sync), 1);
}

#[tokio::test]
async fn test_copy_past_a_full_source_listing_is_not_deleted() {
    let team_sync = event("Team Sync", 100);
    let fake = FakeCalendars::with(
        vec![event("Lunch", 10), event("Standup", 20), team_sync.clone()],
        vec![team_sync.clone(), event("Old Sync", 120)],
    );
    let reconciler = Reconciler::new(fake, title_sync().with_max_results(2));

    let result = reconciler.sync().await.unwrap();

    assert_eq!(result.copied(), 0);
    assert_eq!(result.deleted(), 1);

    let target = reconciler.client().events(TARGET);
    assert_eq!(target.len(), 1);
    assert!(is_equivalent(&target[0], &team_sync));
}

#[tokio::test]
async fn test_unreachable_target_aborts_before_writing() {
    let fake = FakeCalendars {
        unreachable: Some(TARGET.to_string()),
        ..FakeCalendars::with(vec![event("Team Sync", 5)], vec![])
    };
    let reconciler = Reconciler::new(fake, title_sync());

    let err = reconciler.sync().await.unwrap_err();

    assert!(matches!(err, CalSyncError::RemoteQuery { ref calendar, .. } if calendar == TARGET));
    assert_eq!(reconciler.client().write_batches(), 0);
}

#[tokio::test]
async fn test_authentication_failure_propagates() {
    let fake = FakeCalendars {
        reject_auth: true,
        ..FakeCalendars::with(vec![event("Team Sync", 5)], vec![])
    };
    let reconciler = Reconciler::new(fake, title_sync());

    let err = reconciler.sync().await.unwrap_err();

    assert!(matches!(err, CalSyncError::Authentication(_)));
}

#[tokio::test]
async fn test_plan_does_not_write() {
    let fake = FakeCalendars::with(vec![event("Team Sync", 5)], vec![event("Old Sync", 6)]);
    let reconciler = Reconciler::new(fake, title_sync());

    let plan = reconciler.plan().await.unwrap();

    assert_eq!(plan.to_copy.len(), 1);
    assert_eq!(plan.to_copy[0].id, None);
    assert_eq!(plan.to_delete.len(), 1);
    assert_eq!(plan.to_delete[0].title.as_deref(), Some("Old Sync"));
    assert_eq!(reconciler.client().write_batches(), 0);
}

#[tokio::test]
async fn test_copies_only_identity_fields() {
    let mut source_event = event("Team Sync", 5)
        .with_location("Room 4")
        .with_content("Agenda");
    source_event.attendees.push(calsync_core::Attendee {
        name: Some("Alice".into()),
        email: "alice@example.com".into(),
    });

    let fake = FakeCalendars::with(vec![source_event.clone()], vec![]);
    let reconciler = Reconciler::new(fake, title_sync());
    reconciler.sync().await.unwrap();

    let target = reconciler.client().events(TARGET);
    assert_eq!(target.len(), 1);
    assert!(target[0].attendees.is_empty());
    assert_eq!(target[0].location.as_deref(), Some("Room 4"));
    assert_eq!(target[0].content.as_deref(), Some("Agenda"));
}
