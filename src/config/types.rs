use serde::Deserialize;

/// Main configuration structure for Odds-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Provider endpoint configuration
///
/// Path templates are appended to `base_url`. The events path must contain a
/// `{league_id}` placeholder and the markets path an `{event_id}` placeholder.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(rename = "base-url")]
    pub base_url: String,

    #[serde(rename = "sports-path")]
    pub sports_path: String,

    #[serde(rename = "events-path")]
    pub events_path: String,

    #[serde(rename = "markets-path")]
    pub markets_path: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Comma-separated sport names, crawled in this order
    pub sports: String,

    /// Maximum number of league crawls admitted at once
    #[serde(rename = "max-concurrent-tasks")]
    pub max_concurrent_tasks: u32,

    /// Maximum number of events processed per league
    #[serde(rename = "events-per-league")]
    pub events_per_league: u32,

    /// Completed records buffered between the crawl and its consumer
    #[serde(rename = "record-buffer", default = "default_record_buffer")]
    pub record_buffer: usize,
}

impl CrawlerConfig {
    /// Returns the configured sport names in request order
    pub fn sport_names(&self) -> Vec<String> {
        crate::crawler::parse_sport_list(&self.sports)
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Response timeout in seconds
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum response body size held in memory, in megabytes
    #[serde(rename = "max-body-mb", default = "default_max_body_mb")]
    pub max_body_mb: usize,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_body_mb: default_max_body_mb(),
            user_agent: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Print rendered records to stdout
    #[serde(default = "default_true")]
    pub console: bool,

    /// Append rendered records to this file
    #[serde(rename = "file-path", default)]
    pub file_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            console: true,
            file_path: None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(rename = "bind-address", default = "default_bind_address")]
    pub bind_address: String,

    /// Run one crawl to the configured sinks when the server starts
    #[serde(default = "default_true")]
    pub autostart: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            autostart: true,
        }
    }
}

fn default_record_buffer() -> usize {
    64
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_max_body_mb() -> usize {
    5
}

fn default_user_agent() -> String {
    format!("odds-ripple/{}", env!("CARGO_PKG_VERSION"))
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_true() -> bool {
    true
}
