//! Crawl worker
//!
//! A worker repeatedly takes a job from the queue, fetches the page, and
//! submits every in-scope anchor back to the frontier. A job is complete
//! only after all of its candidates have been released by the frontier;
//! only then does the worker report `-1` to the termination detector.
//!
//! Fetch and parse failures affect only the job at hand. The worker logs
//! them and carries on with the next job.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{FrontierHandle, Job, JobBarrier, JobQueue};
use crate::crawler::parser::{anchor_href, PageParser};
use crate::crawler::session::CrawlSession;
use crate::crawler::termination::Delta;
use crate::url::validate_link;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Results accumulated by one worker over its lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerBatch {
    pub worker_id: usize,

    /// Every job this worker completed, in completion order
    pub crawled: Vec<String>,

    /// Jobs whose fetch failed (also present in `crawled`)
    pub failed: Vec<String>,

    /// Links rejected as out of scope, when tracking is enabled
    pub out_of_scope: Vec<String>,
}

/// What happened to a single job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobOutcome {
    Fetched { submitted: usize },
    FetchFailed,
}

/// Everything a worker needs, shared with the rest of the pool
#[derive(Clone)]
pub struct WorkerContext {
    pub session: Arc<CrawlSession>,
    pub fetcher: Arc<dyn Fetcher>,
    pub parser: Arc<dyn PageParser>,
    pub jobs: JobQueue,
    pub frontier: FrontierHandle,
    pub deltas: mpsc::UnboundedSender<Delta>,
    pub shutdown: CancellationToken,
}

/// A single member of the worker pool
pub struct Worker {
    id: usize,
    ctx: WorkerContext,
}

impl Worker {
    pub fn new(id: usize, ctx: WorkerContext) -> Self {
        Self { id, ctx }
    }

    /// Processes jobs until the queue closes or shutdown is signalled
    pub async fn run(self) -> WorkerBatch {
        let mut batch = WorkerBatch {
            worker_id: self.id,
            ..WorkerBatch::default()
        };

        tracing::debug!("Worker {} started", self.id);

        loop {
            let job = tokio::select! {
                biased;

                _ = self.ctx.shutdown.cancelled() => None,
                job = self.ctx.jobs.next() => job,
            };

            let Some(job) = job else {
                break;
            };

            self.process(job, &mut batch).await;
        }

        tracing::debug!(
            "Worker {} exiting after {} jobs",
            self.id,
            batch.crawled.len()
        );
        batch
    }

    /// Runs one job through fetch, extraction and completion accounting
    async fn process(&self, job: Job, batch: &mut WorkerBatch) {
        let barrier = JobBarrier::new();

        let outcome = match self.ctx.fetcher.fetch(&job.url).await {
            Ok(page) => {
                let submitted = self.submit_links(&page.body, &barrier, batch).await;
                JobOutcome::Fetched { submitted }
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", job.url, e);
                JobOutcome::FetchFailed
            }
        };

        // Every +1 caused by this page is reported before this job's -1
        barrier.wait().await;
        if self.ctx.deltas.send(Delta::Completed).is_err() {
            tracing::debug!("Termination detector gone before {} completed", job.url);
        }

        match outcome {
            JobOutcome::Fetched { submitted } => {
                tracing::debug!(
                    "Worker {} crawled {} ({} links submitted)",
                    self.id,
                    job.url,
                    submitted
                );
            }
            JobOutcome::FetchFailed => batch.failed.push(job.url.clone()),
        }
        batch.crawled.push(job.url);
    }

    /// Submits every in-scope anchor of a page to the frontier
    ///
    /// Returns the number of candidates submitted.
    async fn submit_links(&self, body: &str, barrier: &JobBarrier, batch: &mut WorkerBatch) -> usize {
        let base = self.ctx.session.base_url();
        let mut submitted = 0;

        for item in self.ctx.parser.elements(body) {
            let element = match item {
                Ok(element) => element,
                Err(e) => {
                    tracing::warn!("Stopped reading page after {} links: {}", submitted, e);
                    break;
                }
            };

            let Some(href) = anchor_href(&element) else {
                continue;
            };
            if href.is_empty() {
                continue;
            }

            let (link, in_scope) = validate_link(base, href);
            if !in_scope {
                tracing::trace!("Out of scope: {}", link);
                if self.ctx.session.track_out_of_scope() {
                    batch.out_of_scope.push(link);
                }
                continue;
            }

            if let Err(e) = self.ctx.frontier.submit(link, barrier).await {
                tracing::debug!("Worker {}: {}", self.id, e);
                break;
            }
            submitted += 1;
        }

        submitted
    }
}
