use serde::Deserialize;

/// Seed used when neither the config file nor the command line names one
pub const DEFAULT_SEED_URL: &str = "https://parserdigital.com/";

/// Number of workers used when none is configured
pub const DEFAULT_WORKERS: usize = 10;

/// Bound on candidate links waiting to enter the frontier
pub const DEFAULT_FRONTIER_CAPACITY: usize = 256;

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 100;

/// Main configuration structure for Site-Ripple
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// First URL to crawl; also the base every discovered link is scoped to
    #[serde(default = "default_seed_url")]
    pub seed_url: String,

    /// Number of concurrent workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum number of candidate links buffered in front of the frontier
    #[serde(default = "default_frontier_capacity")]
    pub frontier_capacity: usize,

    /// Record links rejected as out of scope in the crawl report
    #[serde(default)]
    pub track_out_of_scope: bool,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Timeout for a whole request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: default_seed_url(),
            workers: DEFAULT_WORKERS,
            frontier_capacity: DEFAULT_FRONTIER_CAPACITY,
            track_out_of_scope: false,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

fn default_seed_url() -> String {
    DEFAULT_SEED_URL.to_string()
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_frontier_capacity() -> usize {
    DEFAULT_FRONTIER_CAPACITY
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("site-ripple/{}", env!("CARGO_PKG_VERSION"))
}
