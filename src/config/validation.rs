use crate::config::types::{Config, CrawlerConfig, HttpConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on the worker pool size
const MAX_WORKERS: usize = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_seed_url(&config.seed_url)?;

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.frontier_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "frontier_capacity must be >= 1, got {}",
            config.frontier_capacity
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the seed URL: it must parse and use HTTP or HTTPS
fn validate_seed_url(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use HTTP or HTTPS, got '{}'",
            seed,
            url.scheme()
        )));
    }

    Ok(())
}
