//! Record assembly
//!
//! Joins a league target, one of its events, and the event's market payload
//! into a [`CompletedRecord`]. This is the only place the four fetched pieces
//! are combined.

use crate::crawler::plan::LeagueTarget;
use crate::model::{CompletedRecord, Event, MarketEnvelope, MarketLines, Runner};
use std::collections::BTreeMap;

/// An event waiting for its markets
///
/// Created once the event list is known and consumed by
/// [`EventContext::with_markets`].
#[derive(Debug, Clone)]
pub struct EventContext<'a> {
    pub target: &'a LeagueTarget,
    pub event: Event,
}

impl<'a> EventContext<'a> {
    pub fn new(target: &'a LeagueTarget, event: Event) -> Self {
        Self { target, event }
    }

    /// Completes the context with fetched markets
    pub fn with_markets(&self, markets: &MarketEnvelope) -> CompletedRecord {
        assemble(self.target, &self.event, markets)
    }
}

/// Builds the completed record for one event
///
/// Closed markets and closed runners are dropped. Runners of markets sharing
/// a name are merged in provider order, groups are sorted by market name, and
/// groups left without open runners are omitted.
pub fn assemble(
    target: &LeagueTarget,
    event: &Event,
    envelope: &MarketEnvelope,
) -> CompletedRecord {
    let mut grouped: BTreeMap<&str, Vec<Runner>> = BTreeMap::new();

    for market in envelope.markets.iter().filter(|m| m.open) {
        let open_runners = market.runners.iter().filter(|r| r.open).cloned();
        grouped
            .entry(market.name.as_str())
            .or_default()
            .extend(open_runners);
    }

    let markets = grouped
        .into_iter()
        .filter(|(_, runners)| !runners.is_empty())
        .map(|(name, runners)| MarketLines {
            name: name.to_string(),
            runners,
        })
        .collect();

    CompletedRecord {
        sport_name: target.sport.clone(),
        region_name: target.region.clone(),
        league_name: target.league.name.clone(),
        league_id: target.league.id,
        event: event.clone(),
        markets,
    }
}
