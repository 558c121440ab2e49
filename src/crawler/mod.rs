//! Crawler module: the concurrent crawl pipeline
//!
//! This module contains the core crawling logic, including:
//! - The crawl session shared by every component
//! - HTTP fetching and element-stream parsing behind swappable traits
//! - The frontier actor and its per-job completion barrier
//! - Termination detection, the worker pool and result aggregation

mod aggregator;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod session;
mod termination;
mod worker;

pub use aggregator::{Aggregator, CrawlResults};
pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{
    intake, Candidate, Frontier, FrontierHandle, FrontierStats, Job, JobBarrier, JobQueue,
    SubmitError,
};
pub use parser::{anchor_href, Element, ElementStream, HtmlParser, PageParser, ParseError, TagKind};
pub use session::CrawlSession;
pub use termination::{Delta, Termination, TerminationDetector};
pub use worker::{Worker, WorkerBatch, WorkerContext};

use crate::config::{validate, Config};
use crate::output::CrawlReport;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration
/// 2. Build the HTTP client
/// 3. Crawl from the seed until no work is outstanding
/// 4. Return the merged report
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(CrawlError)` - Invalid configuration or a crawl-wide failure
pub async fn crawl(config: Config) -> Result<CrawlReport, CrawlError> {
    validate(&config)?;
    Coordinator::new(&config)?.run().await
}
