//! Configuration types for calsync.

mod file;

pub use file::{CalendarsSection, CalsyncConfig, CriteriaSection, LoggingSection, RemoteSection, SyncSection};

use crate::constants::DEFAULT_MAX_RESULTS;
use crate::criterion::CopyCriterion;

/// Resolved values the reconciler runs with.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub source_calendar: String,
    pub target_calendar: String,
    pub criterion: CopyCriterion,
    /// Cap on events fetched per calendar query
    pub max_results: usize,
}

impl SyncConfig {
    pub fn new(
        source_calendar: impl Into<String>,
        target_calendar: impl Into<String>,
        criterion: CopyCriterion,
    ) -> Self {
        SyncConfig {
            source_calendar: source_calendar.into(),
            target_calendar: target_calendar.into(),
            criterion,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}
