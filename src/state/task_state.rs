/// League task state definitions for tracking crawl progress
///
/// Every league target moves through these states exactly once per run.
use std::fmt;

/// Represents the current state of one league crawl unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    // ===== Active States =====
    /// Task spawned, waiting for an admission slot
    Pending,

    /// Admission slot acquired
    Admitted,

    /// Fetching the league's event list
    FetchingEvents,

    /// Fetching markets for retained events
    FetchingMarkets,

    // ===== Terminal States =====
    /// At least one record was assembled for the league
    Assembled,

    /// League had no events (or none survived), nothing emitted
    Skipped,

    /// Event fetch failed, the task was never admitted, or every retained
    /// event's markets failed
    Failed,

    // ===== Final =====
    /// Admission slot released
    Released,
}

impl TaskState {
    /// Returns true if this is a terminal outcome of a league body
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Assembled | Self::Skipped | Self::Failed)
    }

    /// Returns true if the state is reachable from `self` in one step
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        use TaskState::*;
        matches!(
            (self, next),
            (Pending, Admitted)
                | (Pending, Failed)
                | (Admitted, FetchingEvents)
                | (FetchingEvents, FetchingMarkets)
                | (FetchingEvents, Skipped)
                | (FetchingEvents, Failed)
                | (FetchingMarkets, Assembled)
                | (FetchingMarkets, Skipped)
                | (FetchingMarkets, Failed)
                | (Assembled, Released)
                | (Skipped, Released)
                | (Failed, Released)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Admitted => "admitted",
            Self::FetchingEvents => "fetching_events",
            Self::FetchingMarkets => "fetching_markets",
            Self::Assembled => "assembled",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
            Self::Released => "released",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
