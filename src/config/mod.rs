//! Configuration module for Site-Ripple
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a crawl can run without any file at all; the
//! command line overrides whatever the file sets.
//!
//! # Example
//!
//! ```no_run
//! use site_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ripple.toml")).unwrap();
//! println!("Crawling {} with {} workers", config.crawler.seed_url, config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
