//! Run statistics
//!
//! Counts league outcomes and records for one crawl and reports them when the
//! run finishes.

use crate::crawler::LeagueOutcome;
use crate::state::TaskState;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// League targets in the plan
    pub leagues_planned: usize,

    /// Leagues that produced at least one record
    pub leagues_assembled: usize,

    /// Leagues that emitted nothing without a fetch failure
    pub leagues_skipped: usize,

    /// Leagues whose event fetch failed, or whose every market fetch failed
    pub leagues_failed: usize,

    /// Retained events whose market fetch failed
    pub events_failed: usize,

    /// Records handed to the consumer
    pub records: usize,

    /// Highest number of league bodies admitted at once during this run
    pub peak_admitted: usize,
}

impl CrawlStats {
    pub fn new(leagues_planned: usize) -> Self {
        Self {
            leagues_planned,
            ..Self::default()
        }
    }

    /// Folds one league outcome into the totals
    pub fn record(&mut self, outcome: &LeagueOutcome) {
        match outcome.state {
            TaskState::Assembled => self.leagues_assembled += 1,
            TaskState::Skipped => self.leagues_skipped += 1,
            _ => self.leagues_failed += 1,
        }
        self.events_failed += outcome.failed_events;
        self.records += outcome.records;
    }

    /// Leagues that reached a terminal state
    pub fn leagues_finished(&self) -> usize {
        self.leagues_assembled + self.leagues_skipped + self.leagues_failed
    }

    /// Logs the summary at info level
    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl finished: {} records from {}/{} leagues ({} skipped, {} failed, {} event failures, peak concurrency {})",
            self.records,
            self.leagues_assembled,
            self.leagues_planned,
            self.leagues_skipped,
            self.leagues_failed,
            self.events_failed,
            self.peak_admitted
        );
    }
}
