//! Output module for completed records
//!
//! This module handles:
//! - Rendering completed records as text
//! - Delivering records to console, file, or in-memory sinks
//! - Recording run statistics

mod sinks;
pub mod stats;
mod text;
mod traits;

pub use sinks::{build_sink, ConsoleSink, FanoutSink, FileSink, MemorySink};
pub use stats::CrawlStats;
pub use text::{format_kickoff, render_text};
pub use traits::{OutputError, OutputResult, RecordSink};
