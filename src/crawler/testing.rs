//! Scripted provider client for unit tests

use crate::crawler::fetcher::HierarchyClient;
use crate::crawler::plan::LeagueTarget;
use crate::model::{Event, EventEnvelope, League, Market, MarketEnvelope, Runner, Sport};
use crate::{Result, RippleError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory provider; `None` entries fail with a 500
#[derive(Debug, Default)]
pub struct MockClient {
    sports: Option<Vec<Sport>>,
    events: HashMap<i64, Option<Vec<Event>>>,
    markets: HashMap<i64, Option<Vec<Market>>>,
    delay: Duration,
    sports_calls: AtomicUsize,
    active_calls: AtomicUsize,
    peak_calls: AtomicUsize,
    event_calls: Mutex<Vec<i64>>,
    market_calls: Mutex<Vec<i64>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            sports: Some(Vec::new()),
            ..Self::default()
        }
    }

    pub fn with_sports(mut self, sports: Vec<Sport>) -> Self {
        self.sports = Some(sports);
        self
    }

    pub fn with_failing_sports(mut self) -> Self {
        self.sports = None;
        self
    }

    pub fn with_events(mut self, league_id: i64, events: Vec<Event>) -> Self {
        self.events.insert(league_id, Some(events));
        self
    }

    pub fn with_failing_events(mut self, league_id: i64) -> Self {
        self.events.insert(league_id, None);
        self
    }

    pub fn with_markets(mut self, event_id: i64, markets: Vec<Market>) -> Self {
        self.markets.insert(event_id, Some(markets));
        self
    }

    pub fn with_failing_markets(mut self, event_id: i64) -> Self {
        self.markets.insert(event_id, None);
        self
    }

    /// Delay applied to every event and market call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn sports_calls(&self) -> usize {
        self.sports_calls.load(Ordering::SeqCst)
    }

    pub fn event_calls(&self) -> Vec<i64> {
        self.event_calls.lock().unwrap().clone()
    }

    pub fn market_calls(&self) -> Vec<i64> {
        self.market_calls.lock().unwrap().clone()
    }

    /// Highest number of event and market calls in progress at once
    pub fn peak_concurrent_calls(&self) -> usize {
        self.peak_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        let now = self.active_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_calls.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.active_calls.fetch_sub(1, Ordering::SeqCst);
    }
}

fn failure(path: String) -> RippleError {
    RippleError::Status {
        url: format!("mock://{}", path),
        status: 500,
    }
}

#[async_trait]
impl HierarchyClient for MockClient {
    async fn get_sports(&self) -> Result<Vec<Sport>> {
        self.sports_calls.fetch_add(1, Ordering::SeqCst);
        self.sports
            .clone()
            .ok_or_else(|| failure("sports".to_string()))
    }

    async fn get_events(&self, league_id: i64) -> Result<EventEnvelope> {
        self.event_calls.lock().unwrap().push(league_id);
        self.pause().await;
        match self.events.get(&league_id) {
            Some(Some(events)) => Ok(EventEnvelope {
                events: events.clone(),
            }),
            _ => Err(failure(format!("events/{}", league_id))),
        }
    }

    async fn get_markets(&self, event_id: i64) -> Result<MarketEnvelope> {
        self.market_calls.lock().unwrap().push(event_id);
        self.pause().await;
        match self.markets.get(&event_id) {
            Some(Some(markets)) => Ok(MarketEnvelope {
                markets: markets.clone(),
            }),
            _ => Err(failure(format!("markets/{}", event_id))),
        }
    }
}

pub fn event(id: i64) -> Event {
    Event {
        id,
        name: format!("Event {}", id),
        kickoff: 1_700_000_000_000,
    }
}

pub fn league(id: i64, top: bool) -> League {
    League {
        id,
        name: format!("League {}", id),
        top,
    }
}

pub fn league_target(sport: &str, league_id: i64) -> LeagueTarget {
    LeagueTarget {
        sport: sport.to_string(),
        region: "Region".to_string(),
        league: league(league_id, true),
    }
}

pub fn runner(id: i64, name: &str, open: bool) -> Runner {
    Runner {
        id,
        name: name.to_string(),
        open,
        price_str: "2.00".to_string(),
    }
}

/// Open market with two open runners
pub fn open_market(name: &str) -> Market {
    Market {
        name: name.to_string(),
        open: true,
        runners: vec![runner(1, "Home", true), runner(2, "Away", true)],
    }
}
