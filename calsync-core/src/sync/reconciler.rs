//! The two-phase sync run.

use tracing::{debug, info, instrument, warn};

use crate::client::{CalendarClient, EventQuery};
use crate::config::SyncConfig;
use crate::error::CalSyncResult;
use crate::event::Event;
use crate::sync::outcome::{BatchOutcome, SyncResult};
use crate::matcher::find_equivalent;
use crate::sync::plan::{Pool, Staged, SyncPlan, push_copy, stage_copies, stage_orphans};

/// Copies matching upcoming events from the source calendar to the target,
/// then deletes target events whose source has gone.
///
/// Holds no state between runs: every phase queries both calendars fresh.
pub struct Reconciler<C> {
    client: C,
    config: SyncConfig,
}

impl<C: CalendarClient> Reconciler<C> {
    pub fn new(client: C, config: SyncConfig) -> Self {
        Reconciler { client, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run copy-forward, then delete-orphaned.
    ///
    /// Client errors abort the run where they occur. A batch the remote only
    /// partly accepted is logged and counted, not raised.
    pub async fn sync(&self) -> CalSyncResult<SyncResult> {
        let copy = self.copy_forward().await?;
        let delete = self.delete_orphaned().await?;

        Ok(SyncResult { copy, delete })
    }

    /// What `sync` would write right now, without writing it.
    pub async fn plan(&self) -> CalSyncResult<SyncPlan> {
        Ok(SyncPlan {
            to_copy: self.stage_copy_phase().await?,
            to_delete: self.stage_delete_phase().await?,
        })
    }

    #[instrument(skip_all, name = "copy_forward")]
    async fn copy_forward(&self) -> CalSyncResult<BatchOutcome> {
        let source_id = &self.config.source_calendar;
        let target_id = &self.config.target_calendar;
        let criterion = &self.config.criterion;

        let staged = self.stage_copy_phase().await?;

        info!(
            "Found {} events matching the criteria ({})",
            staged.len(),
            criterion
        );

        if staged.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let inserted = self.client.batch_insert(target_id, &staged).await?;
        let outcome = BatchOutcome::new(staged.len(), inserted.len());

        if outcome.is_partial() {
            warn!(
                staged = outcome.staged,
                reported = outcome.reported,
                "Target calendar accepted fewer copies than submitted"
            );
        }

        info!(
            "{} events synchronized ({} -> {})",
            outcome.reported, source_id, target_id
        );

        Ok(outcome)
    }

    #[instrument(skip_all, name = "delete_orphaned")]
    async fn delete_orphaned(&self) -> CalSyncResult<BatchOutcome> {
        let target_id = &self.config.target_calendar;
        let criterion = &self.config.criterion;

        let staged = self.stage_delete_phase().await?;

        info!(
            "Found {} orphaned events matching the criteria ({})",
            staged.len(),
            criterion
        );

        if staged.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let deleted = self.client.batch_delete(target_id, &staged).await?;
        let outcome = BatchOutcome::new(staged.len(), deleted.len());

        if outcome.is_partial() {
            warn!(
                staged = outcome.staged,
                reported = outcome.reported,
                "Target calendar deleted fewer orphans than submitted"
            );
        }

        info!(
            "{} orphaned events deleted from the target calendar ({})",
            outcome.reported, target_id
        );

        Ok(outcome)
    }

    /// Copies of matching source events the target lacks.
    async fn stage_copy_phase(&self) -> CalSyncResult<Vec<Event>> {
        let target_id = &self.config.target_calendar;

        let source = self.upcoming(&self.config.source_calendar).await?;
        let target = self.upcoming(target_id).await?;

        let pool = Pool::fetched(&target, self.config.max_results);
        let Staged { mut events, unresolved } = stage_copies(&source, &pool, &self.config.criterion);

        for event in &unresolved {
            if !self.exists_on(target_id, event).await? {
                push_copy(&mut events, event);
            }
        }

        Ok(events)
    }

    /// Matching target events whose source has gone.
    async fn stage_delete_phase(&self) -> CalSyncResult<Vec<Event>> {
        let source_id = &self.config.source_calendar;

        let target = self.upcoming(&self.config.target_calendar).await?;
        let source = self.upcoming(source_id).await?;

        let pool = Pool::fetched(&source, self.config.max_results);
        let Staged { mut events, unresolved } = stage_orphans(&target, &pool, &self.config.criterion);

        for event in unresolved {
            if !self.exists_on(source_id, &event).await? {
                debug!(event = %event, start = %event.start, "Staging deletion");
                events.push(event);
            }
        }

        Ok(events)
    }

    /// Look for an equivalent of `event` among the events on `calendar_id`
    /// starting while it runs.
    async fn exists_on(&self, calendar_id: &str, event: &Event) -> CalSyncResult<bool> {
        let query = EventQuery::starting_within(
            calendar_id,
            event.start.to_utc(),
            event.end.to_utc(),
            self.config.max_results,
        );
        let candidates = self.client.query_events(&query).await?;

        Ok(find_equivalent(event, &candidates).is_some())
    }

    async fn upcoming(&self, calendar_id: &str) -> CalSyncResult<Vec<Event>> {
        let query = EventQuery::upcoming(calendar_id, self.config.max_results);
        self.client.query_events(&query).await
    }
}
