//! Staging: which events each phase would write.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::criterion::CopyCriterion;
use crate::event::Event;
use crate::matcher::{find_equivalent, matches};

/// The writes a sync run would make, computed without touching the remote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    /// Copies to insert into the target (matching fields only)
    pub to_copy: Vec<Event>,
    /// Target events to delete
    pub to_delete: Vec<Event>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_copy.is_empty() && self.to_delete.is_empty()
    }
}

/// One calendar's upcoming events, as fetched under a result cap.
///
/// A fetch that hit its cap says nothing about events at or past the latest
/// start it returned, so those must be looked up on their own.
#[derive(Debug, Clone, Copy)]
pub struct Pool<'a> {
    events: &'a [Event],
    horizon: Option<DateTime<Utc>>,
}

impl<'a> Pool<'a> {
    /// `max_results` is the cap `events` was fetched with.
    pub fn fetched(events: &'a [Event], max_results: usize) -> Self {
        let horizon = if events.len() >= max_results {
            events.iter().map(|e| e.start.to_utc()).max()
        } else {
            None
        };

        Pool { events, horizon }
    }

    /// A pool known to hold every relevant event.
    pub fn complete(events: &'a [Event]) -> Self {
        Pool { events, horizon: None }
    }

    /// Whether a missing equivalent in this pool means the calendar has none.
    pub fn covers(&self, event: &Event) -> bool {
        self.horizon.is_none_or(|horizon| event.start.to_utc() < horizon)
    }

    pub fn find_equivalent(&self, event: &Event) -> Option<&'a Event> {
        find_equivalent(event, self.events)
    }
}

/// Events a phase would write, plus the ones its pool could not decide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Staged {
    pub events: Vec<Event>,
    /// Matching events past the pool's horizon with no equivalent in it
    pub unresolved: Vec<Event>,
}

/// Source events matching the criterion with no equivalent in `target_pool`,
/// as insertable copies, in source order.
///
/// Equivalent source events are staged once.
pub fn stage_copies(source: &[Event], target_pool: &Pool<'_>, criterion: &CopyCriterion) -> Staged {
    let mut staged = Staged::default();

    for event in source {
        if !matches(event, criterion) || target_pool.find_equivalent(event).is_some() {
            continue;
        }
        if !target_pool.covers(event) {
            debug!(event = %event, start = %event.start, "Copy needs a lookup past the fetched range");
            staged.unresolved.push(event.clone());
            continue;
        }

        push_copy(&mut staged.events, event);
    }

    staged
}

/// Add an insertable copy of `event` unless an equivalent one is already staged.
pub fn push_copy(staged: &mut Vec<Event>, event: &Event) {
    if find_equivalent(event, staged).is_some() {
        debug!(event = %event, start = %event.start, "Skipping duplicate source event");
        return;
    }

    debug!(event = %event, start = %event.start, "Staging copy");
    staged.push(event.copy_for_insert());
}

/// Target events matching the criterion with no equivalent in `source_pool`.
pub fn stage_orphans(target: &[Event], source_pool: &Pool<'_>, criterion: &CopyCriterion) -> Staged {
    let mut staged = Staged::default();

    for event in target {
        if !matches(event, criterion) || source_pool.find_equivalent(event).is_some() {
            continue;
        }
        if !source_pool.covers(event) {
            debug!(event = %event, start = %event.start, "Deletion needs a lookup past the fetched range");
            staged.unresolved.push(event.clone());
            continue;
        }

        debug!(event = %event, start = %event.start, "Staging deletion");
        staged.events.push(event.clone());
    }

    staged
}
