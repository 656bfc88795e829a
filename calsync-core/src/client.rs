//! The calendar client seam.
//!
//! The reconciler only ever talks to a remote service through this trait.
//! `remote::ProviderClient` implements it over the provider protocol; tests
//! implement it in memory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CalSyncResult;
use crate::event::Event;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// A bounded event listing on one calendar, filtered by start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventQuery {
    pub calendar_id: String,
    pub min_start: Option<DateTime<Utc>>,
    pub max_start: Option<DateTime<Utc>>,
    pub max_results: usize,
    pub order: SortOrder,
}

impl EventQuery {
    /// Events starting from now on, earliest first.
    pub fn upcoming(calendar_id: impl Into<String>, max_results: usize) -> Self {
        EventQuery {
            calendar_id: calendar_id.into(),
            min_start: Some(Utc::now()),
            max_start: None,
            max_results,
            order: SortOrder::Ascending,
        }
    }

    /// Events starting between `from` and `to`, both inclusive.
    pub fn starting_within(
        calendar_id: impl Into<String>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        max_results: usize,
    ) -> Self {
        EventQuery {
            calendar_id: calendar_id.into(),
            min_start: Some(from),
            max_start: Some(to.max(from)),
            max_results,
            order: SortOrder::Ascending,
        }
    }

    /// Whether `start` falls inside this query's start-time window.
    pub fn contains_start(&self, start: DateTime<Utc>) -> bool {
        self.min_start.is_none_or(|min| start >= min) && self.max_start.is_none_or(|max| start <= max)
    }
}

/// An authenticated connection to a remote calendar service.
///
/// Batch writes return the subset of events the service accepted; a short
/// return is not an error.
#[async_trait]
pub trait CalendarClient: Send + Sync {
    async fn query_events(&self, query: &EventQuery) -> CalSyncResult<Vec<Event>>;

    async fn batch_insert(&self, calendar_id: &str, events: &[Event]) -> CalSyncResult<Vec<Event>>;

    async fn batch_delete(&self, calendar_id: &str, events: &[Event]) -> CalSyncResult<Vec<Event>>;
}
