//! Crawl session: the immutable parameters of one crawl
//!
//! A session is built once, wrapped in an `Arc`, and handed to every
//! component of the pipeline. Nothing in the crawler reads ambient state.

use crate::config::Config;
use std::time::Duration;

/// Parameters shared by every component of a single crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSession {
    seed_url: String,
    workers: usize,
    fetch_timeout: Duration,
    frontier_capacity: usize,
    track_out_of_scope: bool,
}

impl CrawlSession {
    /// Creates a session with default timeout and frontier capacity
    ///
    /// A worker count of zero is raised to one.
    pub fn new(seed_url: impl Into<String>, workers: usize) -> Self {
        let defaults = Config::default();
        Self {
            seed_url: seed_url.into(),
            workers: workers.max(1),
            fetch_timeout: Duration::from_secs(defaults.http.timeout_secs),
            frontier_capacity: defaults.crawler.frontier_capacity,
            track_out_of_scope: defaults.crawler.track_out_of_scope,
        }
    }

    /// Builds a session from a validated configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.crawler.seed_url.clone(), config.crawler.workers)
            .with_fetch_timeout(Duration::from_secs(config.http.timeout_secs))
            .with_frontier_capacity(config.crawler.frontier_capacity)
            .with_out_of_scope_tracking(config.crawler.track_out_of_scope)
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_frontier_capacity(mut self, capacity: usize) -> Self {
        self.frontier_capacity = capacity.max(1);
        self
    }

    pub fn with_out_of_scope_tracking(mut self, enabled: bool) -> Self {
        self.track_out_of_scope = enabled;
        self
    }

    /// The first URL admitted into the crawl
    pub fn seed_url(&self) -> &str {
        &self.seed_url
    }

    /// The prefix discovered links are validated against
    ///
    /// This is the seed URL itself; the validator trims its trailing slash.
    pub fn base_url(&self) -> &str {
        &self.seed_url
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    pub fn frontier_capacity(&self) -> usize {
        self.frontier_capacity
    }

    pub fn track_out_of_scope(&self) -> bool {
        self.track_out_of_scope
    }
}
