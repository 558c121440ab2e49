//! Frontier: the single gate every discovered link passes through
//!
//! The frontier runs as one task that owns the visited set. Workers never
//! touch that set; they send candidates through a bounded channel
//! ([`FrontierHandle::submit`]) and the frontier admits each distinct URL at
//! most once:
//!
//! 1. Record the URL as visited
//! 2. Report `+1` to the termination detector
//! 3. Enqueue the URL as a [`Job`]
//!
//! Every candidate carries a token from the submitting job's [`JobBarrier`].
//! The frontier drops the token only after steps 1-3, so a worker that waits
//! on its barrier knows every `+1` its page caused was reported before it
//! reports its own `-1`.

use crate::crawler::termination::Delta;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// A URL admitted into the crawl and waiting for a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub url: String,
}

/// Counters kept by the frontier for the final report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierStats {
    /// Distinct URLs admitted as jobs (seed included)
    pub admitted: usize,

    /// Candidates dropped because they were already visited
    pub duplicates: usize,
}

/// Error returned when the frontier no longer accepts candidates
///
/// Only reachable after the crawl has been cancelled.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Frontier closed before {0} could be submitted")]
    Closed(String),
}

/// Completion barrier for one job's candidate submissions
///
/// Each submitted candidate holds a [`BarrierToken`]; [`JobBarrier::wait`]
/// returns once the frontier has processed and released all of them.
#[derive(Debug)]
pub struct JobBarrier {
    token: mpsc::Sender<()>,
    released: mpsc::Receiver<()>,
}

/// Held by a candidate until the frontier is done with it
#[derive(Debug)]
pub struct BarrierToken {
    _token: mpsc::Sender<()>,
}

impl JobBarrier {
    pub fn new() -> Self {
        let (token, released) = mpsc::channel(1);
        Self { token, released }
    }

    pub fn token(&self) -> BarrierToken {
        BarrierToken {
            _token: self.token.clone(),
        }
    }

    /// Waits until every token handed out by this barrier has been dropped
    pub async fn wait(self) {
        let Self {
            token,
            mut released,
        } = self;
        drop(token);
        // Nothing is ever sent: recv resolves to None once all senders are gone
        let _ = released.recv().await;
    }
}

impl Default for JobBarrier {
    fn default() -> Self {
        Self::new()
    }
}

/// A link proposed for crawling
#[derive(Debug)]
pub struct Candidate {
    pub url: String,
    token: BarrierToken,
}

/// Cloneable sending side of the frontier's intake
#[derive(Debug, Clone)]
pub struct FrontierHandle {
    intake: mpsc::Sender<Candidate>,
}

impl FrontierHandle {
    /// Submits a candidate on behalf of the job owning `barrier`
    ///
    /// Waits while the intake is full, so a page with many links cannot
    /// flood the frontier.
    pub async fn submit(&self, url: String, barrier: &JobBarrier) -> Result<(), SubmitError> {
        let candidate = Candidate {
            url,
            token: barrier.token(),
        };
        self.intake
            .send(candidate)
            .await
            .map_err(|e| SubmitError::Closed(e.0.url))
    }
}

/// Creates a frontier intake bounded to `capacity` pending candidates
pub fn intake(capacity: usize) -> (FrontierHandle, mpsc::Receiver<Candidate>) {
    let (intake, inbox) = mpsc::channel(capacity.max(1));
    (FrontierHandle { intake }, inbox)
}

/// Shared receiving side of the job queue
///
/// Workers take turns receiving; each job goes to exactly one worker. The
/// queue closes when the frontier exits and drops the sending side.
#[derive(Debug, Clone)]
pub struct JobQueue {
    jobs: Arc<Mutex<mpsc::UnboundedReceiver<Job>>>,
}

impl JobQueue {
    pub fn new(jobs: mpsc::UnboundedReceiver<Job>) -> Self {
        Self {
            jobs: Arc::new(Mutex::new(jobs)),
        }
    }

    /// Waits for the next job; `None` once the queue is closed and drained
    pub async fn next(&self) -> Option<Job> {
        self.jobs.lock().await.recv().await
    }
}

/// The frontier actor
pub struct Frontier {
    inbox: mpsc::Receiver<Candidate>,
    visited: HashSet<String>,
    jobs: mpsc::UnboundedSender<Job>,
    deltas: mpsc::UnboundedSender<Delta>,
    shutdown: CancellationToken,
    stats: FrontierStats,
}

impl Frontier {
    /// Creates a frontier
    ///
    /// # Arguments
    ///
    /// * `inbox` - Receiving side of the intake created by [`intake`]
    /// * `jobs` - Sending side of the job queue (unbounded: admissions are
    ///   already limited to one per distinct URL)
    /// * `deltas` - Stream to the termination detector
    /// * `shutdown` - Cancelled by the termination detector when the crawl is done
    pub fn new(
        inbox: mpsc::Receiver<Candidate>,
        jobs: mpsc::UnboundedSender<Job>,
        deltas: mpsc::UnboundedSender<Delta>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            inbox,
            visited: HashSet::new(),
            jobs,
            deltas,
            shutdown,
            stats: FrontierStats::default(),
        }
    }

    /// Processes candidates one at a time until shutdown is signalled
    ///
    /// Dropping `self` on return closes the job queue, which is what lets
    /// idle workers exit.
    pub async fn run(mut self) -> FrontierStats {
        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    tracing::debug!("Frontier shutting down");
                    break;
                }

                candidate = self.inbox.recv() => match candidate {
                    Some(candidate) => {
                        self.admit(candidate);
                    }
                    None => {
                        tracing::debug!("Frontier intake closed");
                        break;
                    }
                },
            }
        }

        tracing::debug!(
            "Frontier admitted {} URLs, dropped {} duplicates",
            self.stats.admitted,
            self.stats.duplicates
        );
        self.stats
    }

    /// Admits a candidate if it has not been seen before
    ///
    /// Returns true if the candidate became a job. The candidate's barrier
    /// token is released when this returns.
    pub fn admit(&mut self, candidate: Candidate) -> bool {
        let Candidate { url, token } = candidate;

        if self.visited.contains(&url) {
            tracing::trace!("Already visited: {}", url);
            self.stats.duplicates += 1;
            drop(token);
            return false;
        }

        self.visited.insert(url.clone());
        self.stats.admitted += 1;

        // +1 must be on its way before the job can be picked up and completed
        if self.deltas.send(Delta::Admitted).is_err() {
            tracing::debug!("Termination detector gone, {} not counted", url);
        }

        tracing::debug!("Admitted: {}", url);
        if let Err(e) = self.jobs.send(Job { url }) {
            tracing::debug!("Job queue closed, dropping {}", e.0.url);
        }

        drop(token);
        true
    }

    pub fn stats(&self) -> FrontierStats {
        self.stats
    }
}
