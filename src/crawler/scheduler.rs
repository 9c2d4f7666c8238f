//! Bounded league scheduling
//!
//! This module handles:
//! - Global admission control for league crawls via a counting semaphore
//! - One task per league target, isolated from its siblings
//! - The per-league body: events, event cap, markets, assembly
//!
//! Only league bodies hold an admission slot. Event and market fetches inside
//! one body run sequentially and take no further slots. Each call to
//! `Scheduler::execute` gets a gate of its own.

use crate::crawler::assembler::EventContext;
use crate::crawler::fetcher::HierarchyClient;
use crate::crawler::plan::LeagueTarget;
use crate::model::CompletedRecord;
use crate::output::CrawlStats;
use crate::state::TaskState;
use crate::{Result, RippleError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// Counting gate limiting how many league bodies run at once
///
/// Tracks the number of admitted holders and the highest number observed,
/// so the ceiling can be checked after a run.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    capacity: usize,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

/// An acquired admission slot, released when dropped
#[derive(Debug)]
pub struct Admission {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for Admission {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Waits for a free slot
    pub async fn admit(&self) -> Result<Admission> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| RippleError::GateClosed)?;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        Ok(Admission {
            _permit: permit,
            in_flight: self.in_flight.clone(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently held
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of slots held at once since creation
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Result of one league body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeagueOutcome {
    /// Terminal state reached by the body
    pub state: TaskState,
    /// Records handed to the consumer
    pub records: usize,
    /// Retained events whose markets could not be fetched
    pub failed_events: usize,
}

impl LeagueOutcome {
    fn new(state: TaskState) -> Self {
        Self {
            state,
            records: 0,
            failed_events: 0,
        }
    }
}

/// Runs league targets under a per-run admission gate
pub struct Scheduler {
    client: Arc<dyn HierarchyClient>,
    max_concurrent_tasks: usize,
    events_per_league: usize,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `client` - Shared provider client
    /// * `max_concurrent_tasks` - League bodies admitted at once per run, at least 1
    /// * `events_per_league` - Events processed per league, in provider order
    pub fn new(
        client: Arc<dyn HierarchyClient>,
        max_concurrent_tasks: usize,
        events_per_league: usize,
    ) -> Self {
        if max_concurrent_tasks == 0 {
            tracing::warn!("max-concurrent-tasks is 0, admitting one league at a time");
        }

        Self {
            client,
            max_concurrent_tasks: max_concurrent_tasks.max(1),
            events_per_league,
        }
    }

    /// League bodies admitted at once within one run
    pub fn max_concurrent_tasks(&self) -> usize {
        self.max_concurrent_tasks
    }

    /// Crawls every target, sending records to `tx` as they complete
    ///
    /// Returns once every league task has finished. Failures are logged and
    /// counted, never propagated. Concurrent calls do not share slots.
    pub async fn execute(
        &self,
        targets: Vec<LeagueTarget>,
        tx: mpsc::Sender<CompletedRecord>,
    ) -> CrawlStats {
        let gate = AdmissionGate::new(self.max_concurrent_tasks);
        let mut stats = CrawlStats::new(targets.len());
        let mut tasks = JoinSet::new();

        for target in targets {
            let client = self.client.clone();
            let gate = gate.clone();
            let tx = tx.clone();
            let limit = self.events_per_league;

            tasks.spawn(async move {
                let league_id = target.league.id;
                let mut state = TaskState::Pending;

                let admission = match gate.admit().await {
                    Ok(admission) => admission,
                    Err(e) => {
                        tracing::error!(league_id, "Not admitted: {}", e);
                        advance(league_id, &mut state, TaskState::Failed);
                        return LeagueOutcome::new(state);
                    }
                };
                advance(league_id, &mut state, TaskState::Admitted);

                let outcome = crawl_league(client.as_ref(), &target, limit, &tx).await;

                drop(admission);
                let mut state = outcome.state;
                advance(league_id, &mut state, TaskState::Released);
                outcome
            });
        }
        drop(tx);

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => stats.record(&outcome),
                Err(e) => {
                    tracing::error!("League task aborted: {}", e);
                    stats.record(&LeagueOutcome::new(TaskState::Failed));
                }
            }
        }

        stats.peak_admitted = gate.peak();
        stats
    }
}

/// Moves a league to `next`, checking the step against the lifecycle
fn advance(league_id: i64, state: &mut TaskState, next: TaskState) {
    debug_assert!(
        state.can_transition_to(next),
        "league {}: invalid transition {} -> {}",
        league_id,
        state,
        next
    );
    tracing::trace!(league_id, from = %state, to = %next);
    *state = next;
}

/// Crawls one league: events, cap, then markets per retained event
pub async fn crawl_league(
    client: &dyn HierarchyClient,
    target: &LeagueTarget,
    events_per_league: usize,
    tx: &mpsc::Sender<CompletedRecord>,
) -> LeagueOutcome {
    let league = &target.league;
    let mut state = TaskState::Admitted;
    advance(league.id, &mut state, TaskState::FetchingEvents);

    let envelope = match client.get_events(league.id).await {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::error!(
                sport = %target.sport,
                region = %target.region,
                league = %league.name,
                league_id = league.id,
                "Failed to fetch events: {}",
                e
            );
            advance(league.id, &mut state, TaskState::Failed);
            return LeagueOutcome::new(state);
        }
    };

    if envelope.events.is_empty() {
        tracing::warn!(
            sport = %target.sport,
            league = %league.name,
            league_id = league.id,
            "No events found"
        );
        advance(league.id, &mut state, TaskState::Skipped);
        return LeagueOutcome::new(state);
    }

    let total = envelope.events.len();
    let retained: Vec<_> = envelope.events.into_iter().take(events_per_league).collect();
    tracing::debug!(
        league_id = league.id,
        events = total,
        retained = retained.len(),
        "Fetching markets"
    );
    advance(league.id, &mut state, TaskState::FetchingMarkets);

    let mut outcome = LeagueOutcome::new(state);
    for event in retained {
        if tx.is_closed() {
            tracing::debug!(league_id = league.id, "Record consumer gone, stopping league");
            break;
        }

        let context = EventContext::new(target, event);
        let markets = match client.get_markets(context.event.id).await {
            Ok(markets) => markets,
            Err(e) => {
                tracing::error!(
                    event_id = context.event.id,
                    league = %league.name,
                    sport = %target.sport,
                    "Failed to fetch markets: {}",
                    e
                );
                outcome.failed_events += 1;
                continue;
            }
        };

        let record = context.with_markets(&markets);
        if tx.send(record).await.is_err() {
            tracing::debug!(league_id = league.id, "Record consumer gone, stopping league");
            break;
        }
        outcome.records += 1;
    }

    let terminal = if outcome.records > 0 {
        TaskState::Assembled
    } else if outcome.failed_events > 0 {
        TaskState::Failed
    } else {
        TaskState::Skipped
    };
    advance(league.id, &mut state, terminal);
    outcome.state = state;
    outcome
}
