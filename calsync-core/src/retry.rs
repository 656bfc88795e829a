//! Bounded retry with exponential backoff around a calendar client.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::client::{CalendarClient, EventQuery};
use crate::constants::{DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BASE_DELAY_MS};
use crate::error::CalSyncResult;
use crate::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Never below 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(
            DEFAULT_RETRY_ATTEMPTS,
            Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
        )
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay before the retry following failed attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * (1u32 << attempt.saturating_sub(1).min(6))
    }

    /// Run `call` until it succeeds, fails permanently, or attempts run out.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> CalSyncResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CalSyncResult<T>>,
    {
        let mut attempt = 1;

        loop {
            match call().await {
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(operation, attempt, error = %e, "Remote call failed, retrying in {:?}", delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

/// Wraps a client so queries and deletions are retried on transient errors.
///
/// Inserts go through once: a timed-out insert may still have landed, and
/// repeating it would duplicate events on the target.
pub struct RetryingClient<C> {
    inner: C,
    policy: RetryPolicy,
}

impl<C> RetryingClient<C> {
    pub fn new(inner: C, policy: RetryPolicy) -> Self {
        RetryingClient { inner, policy }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: CalendarClient> CalendarClient for RetryingClient<C> {
    async fn query_events(&self, query: &EventQuery) -> CalSyncResult<Vec<Event>> {
        self.policy
            .run("query_events", move || self.inner.query_events(query))
            .await
    }

    async fn batch_insert(&self, calendar_id: &str, events: &[Event]) -> CalSyncResult<Vec<Event>> {
        self.inner.batch_insert(calendar_id, events).await
    }

    async fn batch_delete(&self, calendar_id: &str, events: &[Event]) -> CalSyncResult<Vec<Event>> {
        self.policy
            .run("batch_delete", move || self.inner.batch_delete(calendar_id, events))
            .await
    }
}
