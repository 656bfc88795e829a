//! One-way filtered sync between a source and a target calendar.

mod outcome;
mod plan;
mod reconciler;

pub use outcome::{BatchOutcome, SyncResult};
pub use plan::{Pool, Staged, SyncPlan, push_copy, stage_copies, stage_orphans};
pub use reconciler::Reconciler;
