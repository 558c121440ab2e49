//! Site-Ripple: a concurrent single-site crawler
//!
//! This crate crawls one web site from a seed URL, following in-scope links
//! with a pool of workers until no work is outstanding anywhere in the
//! pipeline, and reports every URL it admitted.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Ripple operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Termination protocol violated: {0}")]
    Protocol(String),

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Site-Ripple operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlSession};
pub use output::CrawlReport;
pub use crate::url::validate_link;
