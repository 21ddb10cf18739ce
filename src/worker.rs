//! Fixed-size worker pool draining the background ingestion queue.
//!
//! Workers pull jobs from a shared queue receiver and run them to
//! completion; there is no mid-flight cancellation. Shutdown is
//! cooperative: dropping the queue sender lets each worker drain the
//! remaining jobs and exit when the channel closes.

use crate::channel::services::IngestionJob;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// Handler invoked by pool workers for each dequeued job.
///
/// Implementations must be infallible at this boundary: failures are
/// handled inside (logged and reported to the originating channel).
#[async_trait]
pub trait IngestionJobHandler: Send + Sync {
    /// Runs one job to completion.
    async fn handle(&self, job: IngestionJob);
}

/// A fixed-size pool of workers sharing one job queue.
pub struct IngestionWorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl IngestionWorkerPool {
    /// Spawns `worker_count` workers draining `receiver` through
    /// `handler`.
    ///
    /// The receiver is shared: each job is delivered to exactly one
    /// worker. A `worker_count` of zero spawns no workers and leaves the
    /// queue undrained.
    #[must_use]
    pub fn spawn<H>(
        worker_count: usize,
        receiver: mpsc::Receiver<IngestionJob>,
        handler: Arc<H>,
    ) -> Self
    where
        H: IngestionJobHandler + 'static,
    {
        let shared = Arc::new(Mutex::new(receiver));
        let handles = (0..worker_count)
            .map(|index| {
                let receiver = Arc::clone(&shared);
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    tracing::debug!(worker = index, "ingestion worker started");
                    loop {
                        // Hold the lock only for the dequeue so other
                        // workers can pull jobs while this one runs.
                        let next = { receiver.lock().await.recv().await };
                        let Some(job) = next else {
                            break;
                        };
                        handler.handle(job).await;
                    }
                    tracing::debug!(worker = index, "ingestion worker stopped");
                })
            })
            .collect();
        Self { handles }
    }

    /// Returns the number of spawned workers.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every worker to finish.
    ///
    /// Callers must drop the queue sender first, otherwise the workers
    /// never observe channel closure and this call blocks indefinitely.
    pub async fn shutdown(self) {
        for handle in self.handles {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "ingestion worker panicked");
            }
        }
    }
}
