//! Aggregation of worker results
//!
//! Each worker hands in its batch exactly once, when the pool shuts down.
//! Batches are merged under a mutex; ordering across workers is whatever
//! order they finished in.

use crate::crawler::worker::WorkerBatch;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Merged results of every worker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResults {
    /// Every completed job, across all workers
    pub crawled: Vec<String>,

    /// Jobs whose fetch failed
    pub failed: Vec<String>,

    /// Distinct out-of-scope links, sorted
    pub out_of_scope: BTreeSet<String>,

    /// Number of batches merged so far
    pub batches: usize,
}

/// Shared, lock-protected result collection
#[derive(Debug, Default)]
pub struct Aggregator {
    results: Mutex<CrawlResults>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one worker's batch
    pub fn merge(&self, batch: WorkerBatch) {
        tracing::debug!(
            "Merging {} URLs from worker {}",
            batch.crawled.len(),
            batch.worker_id
        );

        let mut results = self.lock();
        results.crawled.extend(batch.crawled);
        results.failed.extend(batch.failed);
        results.out_of_scope.extend(batch.out_of_scope);
        results.batches += 1;
    }

    /// Number of URLs merged so far
    pub fn len(&self) -> usize {
        self.lock().crawled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes the merged results, leaving the aggregator empty
    pub fn take(&self) -> CrawlResults {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, CrawlResults> {
        // A panicking worker cannot leave a half-merged batch behind
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
