//! Fixed-size worker pool with one job queue and one outcome channel.
//!
//! ```text
//! feeder ──jobs──▶ worker 0..N ──outcomes──▶ collector
//!                      │
//!                  barrier (joins workers, then closes outcomes)
//! ```
//!
//! Workers pull from a shared bounded channel, so a busy pool blocks the
//! feeder and at most ~N decoded images are alive at once. Each job runs the
//! synchronous handler on the blocking thread pool. Outcomes arrive in
//! completion order, which is nondeterministic with more than one worker.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::config::Config;
use crate::types::{ConversionJob, ConversionOptions, ConversionOutcome};

use super::converter::Converter;

/// Processes one job to completion. Must not panic across jobs; a panic is
/// caught by the pool and reported as a failure for that job only.
pub trait JobHandler: Send + Sync + 'static {
    fn handle(&self, job: &ConversionJob) -> ConversionOutcome;
}

/// Bounded pool of conversion workers.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
    buffer_size: usize,
}

impl WorkerPool {
    /// Create a pool with `workers` workers (at least one) and a job queue
    /// holding `buffer_size` pending paths (at least one).
    pub fn new(workers: usize, buffer_size: usize) -> Self {
        Self {
            workers: workers.max(1),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Pool sized from `[processing]` and `[pipeline]` settings.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.processing.parallel_workers, config.pipeline.buffer_size)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Convert every path with a shared [`Converter`].
    pub async fn convert<F>(
        &self,
        paths: Vec<PathBuf>,
        options: Arc<ConversionOptions>,
        on_outcome: F,
    ) -> Vec<ConversionOutcome>
    where
        F: FnMut(&ConversionOutcome),
    {
        let converter = Arc::new(Converter::new(options));
        let jobs = paths.into_iter().map(ConversionJob::new).collect();
        self.run(converter, jobs, on_outcome).await
    }

    /// Run every job through `handler`.
    ///
    /// `on_outcome` is called by the single collector for each outcome as it
    /// arrives. Returns all outcomes in completion order once every worker
    /// has finished. Each job yields exactly one outcome.
    pub async fn run<H, F>(
        &self,
        handler: Arc<H>,
        jobs: Vec<ConversionJob>,
        mut on_outcome: F,
    ) -> Vec<ConversionOutcome>
    where
        H: JobHandler + ?Sized,
        F: FnMut(&ConversionOutcome),
    {
        let total = jobs.len();
        tracing::debug!(
            "Dispatching {} job(s) to {} worker(s)",
            total,
            self.workers
        );

        let (job_tx, job_rx) = mpsc::channel::<ConversionJob>(self.buffer_size);
        let (result_tx, mut result_rx) = mpsc::channel::<ConversionOutcome>(self.workers);
        let job_rx = Arc::new(Mutex::new(job_rx));

        // Feeder: enqueue everything, then close the queue by dropping the sender
        let feeder = tokio::spawn(async move {
            for job in jobs {
                if job_tx.send(job).await.is_err() {
                    tracing::warn!("All workers stopped before the queue drained");
                    break;
                }
            }
        });

        let mut handles = Vec::with_capacity(self.workers);
        for id in 0..self.workers {
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            let handler = Arc::clone(&handler);
            handles.push(tokio::spawn(worker_loop(id, handler, job_rx, result_tx)));
        }

        // Barrier: the outcome channel closes only after every worker is done
        let barrier = tokio::spawn(async move {
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::error!("Worker task failed: {e}");
                }
            }
            drop(result_tx);
        });

        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = result_rx.recv().await {
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        if let Err(e) = feeder.await {
            tracing::error!("Job feeder failed: {e}");
        }
        if let Err(e) = barrier.await {
            tracing::error!("Worker barrier failed: {e}");
        }

        tracing::debug!("Collected {}/{} outcome(s)", outcomes.len(), total);
        outcomes
    }
}

async fn worker_loop<H>(
    id: usize,
    handler: Arc<H>,
    jobs: Arc<Mutex<mpsc::Receiver<ConversionJob>>>,
    results: mpsc::Sender<ConversionOutcome>,
) where
    H: JobHandler + ?Sized,
{
    let mut processed = 0usize;
    loop {
        // Hold the lock only while waiting for the next job
        let next = jobs.lock().await.recv().await;
        let Some(job) = next else {
            break;
        };

        let source = job.source_path.clone();
        let handler = Arc::clone(&handler);
        let outcome = match tokio::task::spawn_blocking(move || handler.handle(&job)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Worker {} crashed on {:?}: {}", id, source, e);
                ConversionOutcome::failed(&source, format!("worker panicked: {e}"))
            }
        };
        processed += 1;

        if results.send(outcome).await.is_err() {
            tracing::warn!("Worker {}: collector gone, stopping", id);
            break;
        }
    }
    tracing::trace!("Worker {} finished after {} job(s)", id, processed);
}
