//! Worker Pool
//!
//! Runs a fixed number of OS-thread workers against a shared [`TaskQueue`] and
//! streams one [`Sample`] per executed query back to the calling thread.
//!
//! ## Completion
//!
//! ```text
//!  worker 1 ──┐
//!  worker 2 ──┼──► bounded channel (capacity = total queries) ──► collector
//!  worker N ──┘
//! ```
//!
//! Each worker owns one sender. When a worker runs out of groups it drops its
//! sender and then decrements the shared live-worker counter, so the worker
//! that takes the counter to zero is the one whose exit closed the stream. The
//! collector simply reads until the channel reports disconnection; it starts
//! consuming as soon as the first sample arrives and needs no barrier.
//!
//! ## Failure
//!
//! An executor error is fatal to the run. The failing worker logs it, sends it
//! down the same stream and stops; the collector returns it immediately without
//! waiting for the remaining workers. Callers are expected to exit the process.

use crate::executor::{ExecutorError, QueryExecutor};
use crate::queue::TaskQueue;
use crate::sample::{Sample, WorkerId};
use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error};

/// Errors that end a pool run
#[derive(Debug, Error)]
pub enum PoolError {
    /// The executor rejected a query
    #[error("query for host {host} between {start} and {end} failed")]
    Query {
        /// Worker that ran the query
        worker_id: WorkerId,
        /// Host of the failed query
        host: String,
        /// Range start of the failed query
        start: DateTime<Utc>,
        /// Range end of the failed query
        end: DateTime<Utc>,
        /// Executor error, unchanged
        #[source]
        source: ExecutorError,
    },

    /// The OS refused to start a worker thread
    #[error("failed to spawn worker {worker_id}")]
    Spawn {
        /// Worker that could not start
        worker_id: WorkerId,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked
    #[error("worker {0} panicked")]
    WorkerPanicked(WorkerId),
}

type Outcome = Result<Sample, PoolError>;

/// Fixed-size pool of query workers
pub struct WorkerPool {
    queue: Arc<TaskQueue>,
    executor: Arc<dyn QueryExecutor>,
    workers: usize,
}

impl WorkerPool {
    /// Create a pool of `workers` threads (at least one) over `queue`
    pub fn new(queue: TaskQueue, executor: Arc<dyn QueryExecutor>, workers: usize) -> Self {
        Self {
            queue: Arc::new(queue),
            executor,
            workers: workers.max(1),
        }
    }

    /// Number of worker threads the pool will start
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of samples a successful run produces
    pub fn query_count(&self) -> usize {
        self.queue.query_count()
    }

    /// Run every queued query and return all samples, in arrival order
    pub fn run(self) -> Result<Vec<Sample>, PoolError> {
        self.run_with(|_| {})
    }

    /// Like [`run`](Self::run), calling `observe` on each sample as it arrives
    pub fn run_with<F>(self, mut observe: F) -> Result<Vec<Sample>, PoolError>
    where
        F: FnMut(&Sample),
    {
        let expected = self.queue.query_count();
        let (tx, rx) = crossbeam_channel::bounded::<Outcome>(expected.max(1));
        let live = Arc::new(AtomicUsize::new(self.workers));

        let workers: Vec<Worker> = (0..self.workers)
            .map(|index| Worker {
                id: WorkerId::from_index(index),
                queue: Arc::clone(&self.queue),
                executor: Arc::clone(&self.executor),
                results: Some(tx.clone()),
                live: Arc::clone(&live),
            })
            .collect();
        // From here on only workers hold senders
        drop(tx);

        debug!(workers = self.workers, groups = self.queue.len(), queries = expected, "starting worker pool");

        let mut handles = Vec::with_capacity(workers.len());
        for worker in workers {
            let worker_id = worker.id;
            let handle = thread::Builder::new()
                .name(format!("querybench-worker-{worker_id}"))
                .spawn(move || worker.run())
                .map_err(|source| PoolError::Spawn { worker_id, source })?;
            handles.push((worker_id, handle));
        }

        let mut samples = Vec::with_capacity(expected);
        for outcome in rx.iter() {
            let sample = outcome?;
            debug!(
                host = %sample.host,
                worker = %sample.worker_id,
                rows = sample.row_count,
                "query executed in {:.2}ms",
                sample.duration_ms()
            );
            observe(&sample);
            samples.push(sample);
        }

        // The stream only closes once every worker has exited, so these
        // joins do not wait; they surface panics.
        for (worker_id, handle) in handles {
            if handle.join().is_err() {
                return Err(PoolError::WorkerPanicked(worker_id));
            }
        }

        Ok(samples)
    }
}

struct Worker {
    id: WorkerId,
    queue: Arc<TaskQueue>,
    executor: Arc<dyn QueryExecutor>,
    results: Option<Sender<Outcome>>,
    live: Arc<AtomicUsize>,
}

impl Worker {
    fn run(self) {
        let Some(results) = &self.results else {
            return;
        };

        while let Some(group) = self.queue.claim() {
            debug!(worker = %self.id, host = group.host(), queries = group.len(), "claimed group");

            for query in group.queries() {
                let start = Instant::now();
                let outcome = self.executor.execute(query);
                let duration = start.elapsed();

                let message = match outcome {
                    Ok(row_count) => Ok(Sample {
                        worker_id: self.id,
                        host: query.host.clone(),
                        row_count,
                        duration,
                    }),
                    Err(source) => {
                        error!(
                            worker = %self.id,
                            host = %query.host,
                            start = %query.start,
                            end = %query.end,
                            "query failed: {source}"
                        );
                        let _ = results.send(Err(PoolError::Query {
                            worker_id: self.id,
                            host: query.host.clone(),
                            start: query.start,
                            end: query.end,
                            source,
                        }));
                        return;
                    }
                };

                if results.send(message).is_err() {
                    // Collector has gone away
                    return;
                }
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Sender goes first: when the counter hits zero no sender remains.
        // Runs on unwind too, so a panicking worker still counts out.
        self.results.take();
        if self.live.fetch_sub(1, Ordering::AcqRel) == 1 {
            debug!(worker = %self.id, "last worker exited, result stream closed");
        }
    }
}
