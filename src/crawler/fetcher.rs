//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests to the provider, including:
//! - Building the shared HTTP client
//! - Expanding endpoint path templates
//! - Enforcing the in-memory response size limit
//! - Classifying transport, status, and decode failures

use crate::config::{HttpConfig, ProviderConfig};
use crate::model::{EventEnvelope, MarketEnvelope, Sport};
use crate::{Result, RippleError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Placeholder substituted with a league id in the events path
pub const LEAGUE_ID_PLACEHOLDER: &str = "{league_id}";

/// Placeholder substituted with an event id in the markets path
pub const EVENT_ID_PLACEHOLDER: &str = "{event_id}";

/// Source of the provider hierarchy
///
/// Implementations must be safe to share across every concurrent league task.
#[async_trait]
pub trait HierarchyClient: Send + Sync {
    /// Fetches the full sport catalogue
    async fn get_sports(&self) -> Result<Vec<Sport>>;

    /// Fetches the events of one league
    async fn get_events(&self, league_id: i64) -> Result<EventEnvelope>;

    /// Fetches the markets of one event
    async fn get_markets(&self, event_id: i64) -> Result<MarketEnvelope>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> std::result::Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(config.timeout_seconds))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Provider client over HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpHierarchyClient {
    client: Client,
    provider: ProviderConfig,
    max_body_bytes: usize,
}

impl HttpHierarchyClient {
    /// Creates a client from a prebuilt reqwest client
    pub fn new(client: Client, provider: ProviderConfig, max_body_bytes: usize) -> Self {
        Self {
            client,
            provider,
            max_body_bytes,
        }
    }

    /// Builds the reqwest client from `http` and wraps it
    pub fn from_config(provider: &ProviderConfig, http: &HttpConfig) -> Result<Self> {
        let client = build_http_client(http)?;
        Ok(Self::new(client, provider.clone(), http.max_body_bytes()))
    }

    pub fn sports_url(&self) -> Result<Url> {
        self.endpoint(&self.provider.sports_path)
    }

    pub fn events_url(&self, league_id: i64) -> Result<Url> {
        self.endpoint(
            &self
                .provider
                .events_path
                .replace(LEAGUE_ID_PLACEHOLDER, &league_id.to_string()),
        )
    }

    pub fn markets_url(&self, event_id: i64) -> Result<Url> {
        self.endpoint(
            &self
                .provider
                .markets_path
                .replace(EVENT_ID_PLACEHOLDER, &event_id.to_string()),
        )
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.provider.base_url.trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        };
        Ok(Url::parse(&joined)?)
    }

    /// Fetches a URL and decodes its JSON body
    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let url_str = url.to_string();
        tracing::trace!(url = %url_str, "GET");

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(&url_str, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RippleError::Status {
                url: url_str,
                status: status.as_u16(),
            });
        }

        if let Some(length) = response.content_length() {
            if length as usize > self.max_body_bytes {
                return Err(RippleError::BodyTooLarge {
                    url: url_str,
                    limit: self.max_body_bytes,
                });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| classify_error(&url_str, e))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(RippleError::BodyTooLarge {
                    url: url_str,
                    limit: self.max_body_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&body).map_err(|source| RippleError::Decode {
            url: url_str,
            source,
        })
    }
}

#[async_trait]
impl HierarchyClient for HttpHierarchyClient {
    async fn get_sports(&self) -> Result<Vec<Sport>> {
        let url = self.sports_url()?;
        self.fetch_json(url).await
    }

    async fn get_events(&self, league_id: i64) -> Result<EventEnvelope> {
        let url = self.events_url(league_id)?;
        self.fetch_json(url).await
    }

    async fn get_markets(&self, event_id: i64) -> Result<MarketEnvelope> {
        let url = self.markets_url(event_id)?;
        self.fetch_json(url).await
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> RippleError {
    if error.is_timeout() {
        RippleError::Timeout {
            url: url.to_string(),
        }
    } else {
        RippleError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
