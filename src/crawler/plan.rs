//! Fetch plan construction
//!
//! Turns the requested sport names and the fetched catalogue into the flat
//! list of top leagues to crawl. Missing sports, empty sports, and regions
//! without top leagues are logged and skipped; only an empty catalogue is
//! fatal.

use crate::model::{League, Sport};
use crate::{Result, RippleError};
use std::collections::{HashMap, HashSet};

const SPORT_SEPARATOR: char = ',';

/// One league to crawl, with the names needed to label its records
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueTarget {
    pub sport: String,
    pub region: String,
    pub league: League,
}

/// Ordered set of league targets for one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlPlan {
    sports: Vec<String>,
    targets: Vec<LeagueTarget>,
}

impl CrawlPlan {
    /// Sport names selected from the catalogue, in request order
    pub fn sports(&self) -> &[String] {
        &self.sports
    }

    pub fn targets(&self) -> &[LeagueTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn into_targets(self) -> Vec<LeagueTarget> {
        self.targets
    }
}

/// Splits a comma-separated sport list
///
/// Entries are trimmed; empty and repeated entries are dropped.
pub fn parse_sport_list(list: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    list.split(SPORT_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}

/// Builds the crawl plan from the requested sports and the catalogue
///
/// # Returns
///
/// * `Ok(CrawlPlan)` - Possibly empty if none of the requested sports has top leagues
/// * `Err(RippleError::NoSports)` - The catalogue is empty
pub fn build_plan(requested: &[String], catalogue: Vec<Sport>) -> Result<CrawlPlan> {
    if catalogue.is_empty() {
        tracing::error!("No sports found in catalogue");
        return Err(RippleError::NoSports("catalogue is empty".to_string()));
    }

    let mut by_name: HashMap<String, Sport> = HashMap::with_capacity(catalogue.len());
    for sport in catalogue {
        if by_name.contains_key(&sport.name) {
            tracing::debug!(sport = %sport.name, "Duplicate sport in catalogue, keeping first");
            continue;
        }
        by_name.insert(sport.name.clone(), sport);
    }

    let mut plan = CrawlPlan::default();
    for name in requested {
        let Some(sport) = by_name.get(name) else {
            tracing::warn!(sport = %name, "Requested sport not found in catalogue");
            continue;
        };

        let targets = league_targets(sport);
        if targets.is_empty() {
            tracing::warn!(sport = %sport.name, "No top leagues found for sport");
        } else {
            tracing::debug!(sport = %sport.name, leagues = targets.len(), "Planned sport");
        }

        plan.sports.push(sport.name.clone());
        plan.targets.extend(targets);
    }

    Ok(plan)
}

/// Flattens a sport into its top (region, league) pairs
fn league_targets(sport: &Sport) -> Vec<LeagueTarget> {
    let regions = match sport.regions.as_deref() {
        Some(regions) if !regions.is_empty() => regions,
        _ => {
            tracing::warn!(sport = %sport.name, "No regions found for sport");
            return Vec::new();
        }
    };

    regions
        .iter()
        .filter_map(|region| {
            let top: Vec<_> = region
                .leagues
                .as_deref()
                .unwrap_or_default()
                .iter()
                .filter(|league| league.top)
                .collect();
            if top.is_empty() {
                tracing::warn!(
                    sport = %sport.name,
                    region = %region.name,
                    "No top leagues found for region"
                );
                return None;
            }

            Some(top.into_iter().map(move |league| LeagueTarget {
                sport: sport.name.clone(),
                region: region.name.clone(),
                league: league.clone(),
            }))
        })
        .flatten()
        .collect()
}
