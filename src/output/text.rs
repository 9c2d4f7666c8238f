//! Plain-text rendering of completed records
//!
//! ```text
//! Football, England Premier League
//!     Arsenal - Chelsea, 2023-11-14 22:13:20 UTC, 1
//!         1X2
//!             Home, 1.85, 11
//! ```
//!
//! Indentation uses one tab per level.

use crate::model::CompletedRecord;
use chrono::{TimeZone, Utc};
use std::fmt::Write;

const KICKOFF_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders one record as indented text, ending with a newline
pub fn render_text(record: &CompletedRecord) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}, {} {}",
        record.sport_name, record.region_name, record.league_name
    );
    let _ = writeln!(
        out,
        "\t{}, {} UTC, {}",
        record.event.name,
        format_kickoff(record.event.kickoff),
        record.event.id
    );

    for market in &record.markets {
        let _ = writeln!(out, "\t\t{}", market.name);
        for runner in &market.runners {
            let _ = writeln!(out, "\t\t\t{}, {}, {}", runner.name, runner.price_str, runner.id);
        }
    }

    out
}

/// Formats epoch milliseconds as a UTC timestamp, or the raw value if out of range
pub fn format_kickoff(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(at) => at.format(KICKOFF_FORMAT).to_string(),
        None => millis.to_string(),
    }
}
