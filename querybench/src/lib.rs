#![warn(missing_docs)]
//! # QueryBench
//!
//! Concurrent time-range query benchmark for PostgreSQL / TimescaleDB.
//!
//! QueryBench replays a list of `hostname,start,end` queries against a
//! database with a fixed pool of workers and reports the latency distribution:
//! - **Host affinity**: all queries for one host run in order on a single worker
//! - **Wait-free dispatch**: workers claim host groups through one atomic cursor
//! - **Fail-fast**: the first query error aborts the run with the failing range
//! - **Exact statistics**: percentiles over the full sample, Welford standard deviation
//!
//! ## Quick Start
//!
//! ```ignore
//! use querybench::prelude::*;
//!
//! let queue = TaskQueue::new(WorkGroup::partition(queries, GroupOrder::LargestFirst));
//! let executor = Arc::new(|q: &Query| -> Result<u64, ExecutorError> { Ok(0) });
//! let samples = WorkerPool::new(queue, executor, 8).run()?;
//! let durations: Vec<_> = samples.iter().map(|s| s.duration).collect();
//! let stats = compute_summary(&durations);
//! ```

// Re-export core types
pub use querybench_core::{
    ExecutorError, GroupOrder, PoolError, Query, QueryExecutor, Sample, TaskQueue, WorkGroup,
    WorkerId, WorkerPool,
};

// Re-export stats
pub use querybench_stats::{SummaryStats, TAIL_PERCENTILE, compute_summary, percentile};

// Re-export report model
pub use querybench_report::{
    OutputFormat, Report, ReportMeta, ReportSummary, WorkerReport, generate_json_report,
};

// Re-export loading and rendering
pub use querybench_cli::{LoadError, build_report, format_human_output, load_queries, load_work};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ExecutorError, GroupOrder, Query, QueryExecutor, Sample, TaskQueue, WorkGroup, WorkerPool,
        compute_summary,
    };
}

/// Run the QueryBench CLI.
///
/// Call this from a binary's `main()`:
/// ```ignore
/// fn main() {
///     querybench::run().unwrap();
/// }
/// ```
pub use querybench_cli::run;
