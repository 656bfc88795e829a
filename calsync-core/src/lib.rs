//! Core types for calsync.
//!
//! This crate holds everything `calsync` needs to mirror a filtered set of
//! events from one remote calendar to another:
//! - `Event` and the copy criterion it is matched against
//! - `matcher` for criterion matching and event equivalence
//! - `sync` with the two-phase `Reconciler`
//! - `client` defining the `CalendarClient` seam, implemented over the
//!   provider protocol in `remote`

pub mod client;
pub mod config;
pub mod constants;
pub mod criterion;
pub mod error;
pub mod event;
pub mod matcher;
pub mod remote;
pub mod retry;
pub mod sync;

pub use client::{CalendarClient, EventQuery, SortOrder};
pub use criterion::{CopyCriterion, CriterionField};
pub use error::{CalSyncError, CalSyncResult};
pub use event::{Attendee, Event, EventStatus, EventTime};
pub use sync::{BatchOutcome, Reconciler, SyncPlan, SyncResult};
