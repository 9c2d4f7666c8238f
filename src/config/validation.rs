use crate::config::types::{
    Config, CrawlerConfig, HttpConfig, OutputConfig, ProviderConfig, ServerConfig,
};
use crate::crawler::{EVENT_ID_PLACEHOLDER, LEAGUE_ID_PLACEHOLDER};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_provider_config(&config.provider)?;
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates provider endpoints
fn validate_provider_config(config: &ProviderConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.sports_path.is_empty() {
        return Err(ConfigError::InvalidTemplate(
            "sports-path cannot be empty".to_string(),
        ));
    }

    require_placeholder("events-path", &config.events_path, LEAGUE_ID_PLACEHOLDER)?;
    require_placeholder("markets-path", &config.markets_path, EVENT_ID_PLACEHOLDER)?;

    Ok(())
}

fn require_placeholder(name: &str, template: &str, placeholder: &str) -> Result<(), ConfigError> {
    if !template.contains(placeholder) {
        return Err(ConfigError::InvalidTemplate(format!(
            "{} must contain {}, got '{}'",
            name, placeholder, template
        )));
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.sport_names().is_empty() {
        return Err(ConfigError::Validation(
            "sports must name at least one sport".to_string(),
        ));
    }

    if config.max_concurrent_tasks < 1 {
        return Err(ConfigError::Validation(
            "max-concurrent-tasks must be >= 1".to_string(),
        ));
    }

    if config.record_buffer < 1 {
        return Err(ConfigError::Validation(
            "record-buffer must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-seconds must be >= 1, got {}",
            config.timeout_seconds
        )));
    }

    if config.max_body_mb < 1 {
        return Err(ConfigError::Validation(format!(
            "max-body-mb must be >= 1, got {}",
            config.max_body_mb
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.file_path {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "file-path cannot be empty when set".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "bind-address '{}' is not a socket address: {}",
            config.bind_address, e
        ))
    })?;
    Ok(())
}
