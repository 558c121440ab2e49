//! Termination detection for the crawl pipeline
//!
//! Work in this crawler is generated dynamically: any page may produce new
//! jobs, so there is no natural end-of-input. The detector keeps the only
//! count of outstanding jobs. The frontier reports `+1` for every admission,
//! and each worker reports `-1` once a job is fully processed, meaning its
//! page was fetched and parsed and every candidate it produced was released
//! by the frontier. When the count returns to zero nothing can produce more
//! work, and the detector cancels the shutdown token exactly once.

use crate::CrawlError;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A change to the number of outstanding jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delta {
    /// A job was admitted by the frontier (+1)
    Admitted,
    /// A worker finished a job (-1)
    Completed,
}

/// How the crawl ended, as seen by the detector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Termination {
    /// Number of `+1` deltas observed
    pub admitted: usize,

    /// Number of `-1` deltas observed
    pub completed: usize,

    /// True if the crawl was cancelled before the count reached zero
    pub cancelled: bool,
}

/// The termination detector actor
pub struct TerminationDetector {
    deltas: mpsc::UnboundedReceiver<Delta>,
    shutdown: CancellationToken,
    pending: usize,
    admitted: usize,
    completed: usize,
}

impl TerminationDetector {
    pub fn new(deltas: mpsc::UnboundedReceiver<Delta>, shutdown: CancellationToken) -> Self {
        Self {
            deltas,
            shutdown,
            pending: 0,
            admitted: 0,
            completed: 0,
        }
    }

    /// Number of jobs admitted but not yet completed
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Consumes deltas until the pending count returns to zero
    ///
    /// On completion (or on a protocol violation) the shutdown token is
    /// cancelled before returning, which stops the frontier and the workers.
    ///
    /// # Returns
    ///
    /// * `Ok(Termination)` - The count reached zero, or the crawl was cancelled
    /// * `Err(CrawlError::Protocol)` - A completion arrived with nothing
    ///   outstanding, or every sender went away while jobs were outstanding
    pub async fn run(mut self) -> Result<Termination, CrawlError> {
        let result = self.observe().await;
        self.shutdown.cancel();
        result
    }

    async fn observe(&mut self) -> Result<Termination, CrawlError> {
        loop {
            let delta = tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    tracing::debug!(
                        "Crawl cancelled with {} jobs outstanding",
                        self.pending
                    );
                    return Ok(self.summary(true));
                }

                delta = self.deltas.recv() => delta,
            };

            let Some(delta) = delta else {
                return Err(CrawlError::Protocol(format!(
                    "delta stream closed with {} jobs outstanding",
                    self.pending
                )));
            };

            if self.apply(delta)? {
                tracing::debug!(
                    "No work outstanding after {} jobs, shutting down",
                    self.completed
                );
                return Ok(self.summary(false));
            }
        }
    }

    /// Applies one delta; returns true when the count has returned to zero
    pub fn apply(&mut self, delta: Delta) -> Result<bool, CrawlError> {
        match delta {
            Delta::Admitted => {
                self.pending += 1;
                self.admitted += 1;
                Ok(false)
            }
            Delta::Completed => {
                self.pending = self.pending.checked_sub(1).ok_or_else(|| {
                    tracing::error!("Job completed with no jobs outstanding");
                    CrawlError::Protocol("job completed with no jobs outstanding".to_string())
                })?;
                self.completed += 1;
                Ok(self.pending == 0)
            }
        }
    }

    fn summary(&self, cancelled: bool) -> Termination {
        Termination {
            admitted: self.admitted,
            completed: self.completed,
            cancelled,
        }
    }
}
