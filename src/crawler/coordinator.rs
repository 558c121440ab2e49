//! Crawler coordinator - wiring of the crawl pipeline
//!
//! The coordinator owns nothing at runtime. It builds the channels, spawns
//! one termination detector, one frontier and N workers, submits the seed,
//! and then waits for the pool to drain:
//!
//! ```text
//! seed ──► Frontier ──jobs──► Worker × N ──candidates──┐
//!             ▲ │                  │                    │
//!             │ └──+1──► Detector ◄┘ -1                 │
//!             └─────────────────────────────────────────┘
//! ```
//!
//! The detector cancels the shutdown token when the outstanding count
//! returns to zero; the frontier then exits, closing the job queue, and
//! every worker hands its batch to the aggregator.

use crate::config::Config;
use crate::crawler::aggregator::Aggregator;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::{
    intake, Frontier, FrontierHandle, FrontierStats, JobBarrier, JobQueue,
};
use crate::crawler::parser::{HtmlParser, PageParser};
use crate::crawler::session::CrawlSession;
use crate::crawler::termination::{Termination, TerminationDetector};
use crate::crawler::worker::{Worker, WorkerContext};
use crate::output::CrawlReport;
use crate::CrawlError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Main crawler coordinator structure
pub struct Coordinator {
    session: Arc<CrawlSession>,
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn PageParser>,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP and parses with `scraper`
    ///
    /// # Arguments
    ///
    /// * `config` - A validated crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError::HttpClient)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::new(&config.http)?;
        Ok(Self::with_components(
            CrawlSession::from_config(config),
            Arc::new(fetcher),
            Arc::new(HtmlParser),
        ))
    }

    /// Creates a coordinator from explicit fetch and parse capabilities
    pub fn with_components(
        session: CrawlSession,
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn PageParser>,
    ) -> Self {
        Self {
            session: Arc::new(session),
            fetcher,
            parser,
        }
    }

    pub fn session(&self) -> &CrawlSession {
        &self.session
    }

    /// Crawls until no work is outstanding
    pub async fn run(&self) -> Result<CrawlReport, CrawlError> {
        self.run_until_cancelled(CancellationToken::new()).await
    }

    /// Crawls until no work is outstanding or `cancel` is cancelled
    ///
    /// On cancellation every worker finishes the job it holds and exits;
    /// the report is marked `cancelled` and contains what was crawled so far.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The crawl finished or was cancelled
    /// * `Err(CrawlError::Worker)` - A worker task panicked
    /// * `Err(CrawlError::Protocol)` - The termination protocol was violated
    pub async fn run_until_cancelled(
        &self,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        let started_at = Utc::now();
        let start_time = Instant::now();
        let workers = self.session.workers();

        tracing::info!(
            "Starting crawl of {} with {} workers",
            self.session.seed_url(),
            workers
        );

        let shutdown = cancel.child_token();
        let (delta_tx, delta_rx) = mpsc::unbounded_channel();
        let (job_tx, job_rx) = mpsc::unbounded_channel();
        let (frontier, inbox) = intake(self.session.frontier_capacity());

        let detector = tokio::spawn(TerminationDetector::new(delta_rx, shutdown.clone()).run());
        let frontier_task = tokio::spawn(
            Frontier::new(inbox, job_tx, delta_tx.clone(), shutdown.clone()).run(),
        );

        let aggregator = Arc::new(Aggregator::new());
        let ctx = WorkerContext {
            session: self.session.clone(),
            fetcher: self.fetcher.clone(),
            parser: self.parser.clone(),
            jobs: JobQueue::new(job_rx),
            frontier: frontier.clone(),
            deltas: delta_tx,
            shutdown: shutdown.clone(),
        };

        let mut pool = JoinSet::new();
        for id in 1..=workers {
            let worker = Worker::new(id, ctx.clone());
            let aggregator = aggregator.clone();
            pool.spawn(async move {
                let batch = worker.run().await;
                aggregator.merge(batch);
            });
        }
        // Only workers and the frontier may report deltas from here on
        drop(ctx);

        let seeded = self.submit_seed(frontier, &cancel).await;
        if seeded.is_err() {
            shutdown.cancel();
        }

        let mut worker_error = None;
        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task failed: {}", e);
                shutdown.cancel();
                worker_error.get_or_insert(e);
            }
        }

        // Workers only exit after shutdown, so both actors are finishing
        let stats: FrontierStats = frontier_task.await?;
        let termination: Termination = detector.await??;
        seeded?;
        if let Some(e) = worker_error {
            return Err(CrawlError::Worker(e));
        }

        let results = aggregator.take();
        let elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl finished: {} URLs in {:.2}s ({} failed, {} duplicates dropped)",
            results.crawled.len(),
            elapsed.as_secs_f64(),
            results.failed.len(),
            stats.duplicates
        );

        Ok(CrawlReport {
            seed_url: self.session.seed_url().to_string(),
            workers,
            started_at,
            finished_at: Utc::now(),
            elapsed,
            crawled: results.crawled,
            failed: results.failed,
            out_of_scope: results.out_of_scope.into_iter().collect(),
            admitted: stats.admitted,
            duplicates: stats.duplicates,
            cancelled: termination.cancelled,
        })
    }

    /// Admits the seed through the frontier like any other candidate
    async fn submit_seed(
        &self,
        frontier: FrontierHandle,
        cancel: &CancellationToken,
    ) -> Result<(), CrawlError> {
        let barrier = JobBarrier::new();
        let submitted = frontier
            .submit(self.session.seed_url().to_string(), &barrier)
            .await;
        drop(frontier);

        match submitted {
            Ok(()) => {
                barrier.wait().await;
                Ok(())
            }
            Err(e) if cancel.is_cancelled() => {
                tracing::debug!("Crawl cancelled before the seed was admitted: {}", e);
                Ok(())
            }
            Err(e) => Err(CrawlError::Protocol(e.to_string())),
        }
    }
}
