//! Provider payloads and the completed per-event record
//!
//! Everything here is decoded once from the provider and never mutated
//! afterwards. Optional lists mirror the provider, which sends `null` for
//! sports without regions and regions without leagues.

use serde::{Deserialize, Serialize};

/// A sport from the catalogue, keyed by name
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sport {
    pub name: String,
    #[serde(default)]
    pub regions: Option<Vec<Region>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Region {
    pub name: String,
    #[serde(default)]
    pub leagues: Option<Vec<League>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct League {
    pub id: i64,
    pub name: String,
    /// Featured league flag; only top leagues are crawled
    #[serde(default)]
    pub top: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    /// Kickoff instant in epoch milliseconds
    pub kickoff: i64,
}

/// Response of the events-by-league endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Market {
    pub name: String,
    #[serde(default)]
    pub open: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub runners: Vec<Runner>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runner {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub open: bool,
    /// Display price exactly as the provider formats it
    #[serde(default)]
    pub price_str: String,
}

/// Response of the markets-by-event endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MarketEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub markets: Vec<Market>,
}

/// Open runners of every open market sharing one name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketLines {
    pub name: String,
    pub runners: Vec<Runner>,
}

/// One event joined with its league context and open markets
///
/// Markets are sorted by name; runners keep provider order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedRecord {
    pub sport_name: String,
    pub region_name: String,
    pub league_name: String,
    pub league_id: i64,
    pub event: Event,
    pub markets: Vec<MarketLines>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
