//! Crawler module for the provider hierarchy
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of the catalogue, events, and markets
//! - Building the plan of top leagues to crawl
//! - Bounded scheduling of league crawls
//! - Assembling completed records
//! - Overall crawl coordination

mod assembler;
mod coordinator;
mod fetcher;
mod plan;
mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use assembler::{assemble, EventContext};
pub use coordinator::{run_crawl, Coordinator, RecordStream};
pub use fetcher::{
    build_http_client, HierarchyClient, HttpHierarchyClient, EVENT_ID_PLACEHOLDER,
    LEAGUE_ID_PLACEHOLDER,
};
pub use plan::{build_plan, parse_sport_list, CrawlPlan, LeagueTarget};
pub use scheduler::{crawl_league, Admission, AdmissionGate, LeagueOutcome, Scheduler};
