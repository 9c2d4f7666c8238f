//! Odds-Ripple main entry point
//!
//! This is the command-line interface for the Odds-Ripple line crawler.

use anyhow::Context;
use clap::Parser;
use odds_ripple::config::{load_config_with_hash, Config};
use odds_ripple::crawler::{run_crawl, Coordinator};
use odds_ripple::server;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Odds-Ripple: a bounded-concurrency betting line crawler
///
/// Odds-Ripple walks a provider's sports catalogue down to individual
/// runners for the configured sports, keeping at most a fixed number of
/// leagues in flight, and prints one record per event.
#[derive(Parser, Debug)]
#[command(name = "odds-ripple")]
#[command(version = "1.0.0")]
#[command(about = "A bounded-concurrency betting line crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Fetch the catalogue and show which leagues would be crawled
    #[arg(long, conflicts_with = "serve")]
    dry_run: bool,

    /// Serve crawl results over HTTP
    #[arg(long)]
    serve: bool,

    /// Append rendered records to this file, overriding the configured path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if let Some(path) = &cli.output {
        config.output.file_path = Some(path.display().to_string());
    }

    if cli.dry_run {
        handle_dry_run(&config).await
    } else if cli.serve {
        server::serve(&config).await.context("Server failed")
    } else {
        handle_crawl(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("odds_ripple=info,warn"),
            1 => EnvFilter::new("odds_ripple=debug,info"),
            2 => EnvFilter::new("odds_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: fetches the catalogue and prints the plan
async fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Odds-Ripple Dry Run ===\n");

    println!("Provider:");
    println!("  Base URL: {}", config.provider.base_url);
    println!("  Sports: {}", config.provider.sports_path);
    println!("  Events: {}", config.provider.events_path);
    println!("  Markets: {}", config.provider.markets_path);

    println!("\nCrawler Configuration:");
    println!(
        "  Max concurrent tasks: {}",
        config.crawler.max_concurrent_tasks
    );
    println!("  Events per league: {}", config.crawler.events_per_league);

    let coordinator = Coordinator::new(config).context("Failed to build HTTP client")?;
    println!("\nRequested Sports ({}):", coordinator.sports().len());
    for sport in coordinator.sports() {
        println!("  - {}", sport);
    }

    let plan = coordinator.plan().await.context("Failed to build crawl plan")?;

    println!("\nTop Leagues ({}):", plan.len());
    for target in plan.targets() {
        println!(
            "  - {} / {} / {} ({})",
            target.sport, target.region, target.league.name, target.league.id
        );
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} leagues", plan.len());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling sports [{}] with at most {} leagues in flight",
        config.crawler.sport_names().join(", "),
        config.crawler.max_concurrent_tasks
    );

    let stats = run_crawl(config).await.context("Crawl failed")?;
    tracing::info!(
        "Crawl completed: {} records from {} leagues",
        stats.records,
        stats.leagues_finished()
    );

    Ok(())
}
