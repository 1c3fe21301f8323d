//! Fixed-concurrency worker pool over independent units of work.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::error::Result;

/// Runs one async task per item with at most `workers` in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    workers: usize,
}

/// Counts from a finished pool run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolReport {
    pub total: usize,
    pub completed: usize,
    /// Units that returned an error or panicked
    pub failed: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(8)
    }
}

impl WorkerPool {
    /// Create a pool; a worker count of zero is raised to one.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process every item and wait for all of them.
    ///
    /// A unit that fails or panics is logged and counted; it never cancels
    /// its siblings.
    pub async fn run<I, F, Fut>(&self, items: Vec<I>, work: F) -> PoolReport
    where
        I: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let total = items.len();
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let work = Arc::new(work);
        let mut tasks = JoinSet::new();

        info!(total, workers = self.workers, "Starting worker pool");

        for item in items {
            let semaphore = semaphore.clone();
            let work = work.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                work(item).await
            });
        }

        let mut report = PoolReport {
            total,
            ..Default::default()
        };
        let step = (total / 20).max(1);

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => report.completed += 1,
                Ok(Err(e)) => {
                    warn!(error = %e, "Unit failed");
                    report.failed += 1;
                }
                Err(e) => {
                    error!(error = %e, "Unit task panicked or was cancelled");
                    report.failed += 1;
                }
            }

            let done = report.completed + report.failed;
            if done % step == 0 || done == total {
                info!(done, total, failed = report.failed, "Progress {}/{}", done, total);
            }
        }

        info!(
            completed = report.completed,
            failed = report.failed,
            total,
            "Worker pool finished"
        );
        report
    }
}
