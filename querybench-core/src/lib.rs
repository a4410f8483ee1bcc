#![warn(missing_docs)]
//! QueryBench Core - Concurrent Execution Engine
//!
//! This crate fans a set of per-host time-range queries out to a pool of
//! worker threads:
//! - `WorkGroup` partitions queries by host; a group is the unit of claim
//! - `TaskQueue` hands groups to workers with a single atomic cursor
//! - `WorkerPool` drains the queue and streams back one `Sample` per query
//! - `QueryExecutor` is the data-store capability injected into the pool

mod executor;
mod pool;
mod query;
mod queue;
mod sample;

pub use executor::{ExecutorError, QueryExecutor};
pub use pool::{PoolError, WorkerPool};
pub use query::{GroupOrder, Query, WorkGroup};
pub use queue::TaskQueue;
pub use sample::{Sample, WorkerId};
