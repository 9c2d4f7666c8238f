//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties the crawl together:
//! - Fetching the sport catalogue and building the plan
//! - Handing league targets to the scheduler
//! - Delivering completed records to a sink (batch) or a stream
//!
//! Both delivery modes run the same scheduler; the stream is the receiving
//! end of the channel the scheduler sends records into. Every run admits
//! leagues through its own gate, so concurrent runs never wait on each other.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{HierarchyClient, HttpHierarchyClient};
use crate::crawler::plan::{build_plan, CrawlPlan};
use crate::crawler::scheduler::Scheduler;
use crate::model::CompletedRecord;
use crate::output::{build_sink, CrawlStats, RecordSink};
use crate::{Result, RippleError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Completed records of one crawl, in completion order
pub type RecordStream = ReceiverStream<CompletedRecord>;

/// Main crawler coordinator structure
pub struct Coordinator {
    client: Arc<dyn HierarchyClient>,
    sports: Vec<String>,
    scheduler: Arc<Scheduler>,
    record_buffer: usize,
}

impl Coordinator {
    /// Creates a coordinator talking to the configured provider over HTTP
    pub fn new(config: &Config) -> Result<Self> {
        let client = HttpHierarchyClient::from_config(&config.provider, &config.http)?;
        Ok(Self::with_client(Arc::new(client), &config.crawler))
    }

    /// Creates a coordinator over any hierarchy client
    pub fn with_client(client: Arc<dyn HierarchyClient>, crawler: &CrawlerConfig) -> Self {
        let scheduler = Scheduler::new(
            client.clone(),
            crawler.max_concurrent_tasks as usize,
            crawler.events_per_league as usize,
        );

        Self {
            client,
            sports: crawler.sport_names(),
            scheduler: Arc::new(scheduler),
            record_buffer: crawler.record_buffer.max(1),
        }
    }

    /// Requested sport names, in request order
    pub fn sports(&self) -> &[String] {
        &self.sports
    }

    /// Fetches the catalogue and builds the crawl plan
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlPlan)` - League targets to crawl
    /// * `Err(RippleError::NoSports)` - Catalogue fetch failed or returned nothing
    pub async fn plan(&self) -> Result<CrawlPlan> {
        let catalogue = self.client.get_sports().await.map_err(|e| {
            tracing::error!("Failed to fetch sport catalogue: {}", e);
            RippleError::NoSports(e.to_string())
        })?;
        tracing::debug!("Catalogue contains {} sports", catalogue.len());

        let plan = build_plan(&self.sports, catalogue)?;
        tracing::info!(
            "Planned {} leagues across {} sports",
            plan.len(),
            plan.sports().len()
        );
        Ok(plan)
    }

    /// Runs a full crawl, handing every record to `sink`
    ///
    /// Returns after every league task has finished. Sink failures are
    /// logged per record and do not stop the crawl.
    pub async fn run(&self, sink: &dyn RecordSink) -> Result<CrawlStats> {
        let plan = self.plan().await?;
        let (tx, mut rx) = mpsc::channel(self.record_buffer);

        let crawl = self.scheduler.execute(plan.into_targets(), tx);
        let deliver = async {
            while let Some(record) = rx.recv().await {
                if let Err(e) = sink.emit(&record).await {
                    tracing::warn!(event_id = record.event.id, "Failed to emit record: {}", e);
                }
            }
        };

        let (stats, ()) = tokio::join!(crawl, deliver);
        stats.log_summary();
        Ok(stats)
    }

    /// Starts a full crawl and returns its records as a stream
    ///
    /// Planning happens before this returns, so a fatal catalogue failure is
    /// reported here. The stream ends once every league task has finished.
    /// Dropping the stream stops leagues from fetching further events.
    pub async fn stream(&self) -> Result<RecordStream> {
        let plan = self.plan().await?;
        let (tx, rx) = mpsc::channel(self.record_buffer);

        let scheduler = self.scheduler.clone();
        tokio::spawn(async move {
            let stats = scheduler.execute(plan.into_targets(), tx).await;
            stats.log_summary();
        });

        Ok(ReceiverStream::new(rx))
    }
}

/// Runs one crawl from configuration to the configured sinks
///
/// # Example
///
/// ```no_run
/// use odds_ripple::config::load_config;
/// use odds_ripple::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let stats = run_crawl(&config).await?;
/// println!("{} records", stats.records);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlStats> {
    let coordinator = Coordinator::new(config)?;
    let sink = build_sink(&config.output).await?;
    coordinator.run(&sink).await
}
