//! PostgreSQL Executor
//!
//! Blocking [`QueryExecutor`] over an async `sqlx` pool. The pool lives on a
//! private tokio runtime; each worker thread parks in `block_on` for the
//! duration of its query, so pool workers stay plain OS threads.

use futures_util::TryStreamExt;
use querybench_core::{ExecutorError, Query, QueryExecutor};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tokio::runtime::Runtime;

/// One-minute min/max CPU usage buckets for one host over a closed time range
pub const CPU_STATS_QUERY: &str = "\
SELECT time_bucket('1 minute', u.ts) AS one_min, min(u.usage), max(u.usage) \
FROM cpu_usage u \
WHERE u.host = $1 AND u.ts BETWEEN $2 AND $3 \
GROUP BY one_min \
ORDER BY one_min DESC";

/// Executes [`CPU_STATS_QUERY`] against PostgreSQL / TimescaleDB
pub struct PgExecutor {
    runtime: Runtime,
    pool: PgPool,
}

impl PgExecutor {
    /// Build the runtime and open a pool of `max_connections` connections.
    ///
    /// One connection per worker keeps workers from queueing on each other.
    pub fn connect(url: &str, max_connections: usize, acquire_timeout: Duration) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("querybench-io")
            .build()?;

        let pool = runtime.block_on(
            PgPoolOptions::new()
                .max_connections(max_connections.max(1) as u32)
                .acquire_timeout(acquire_timeout)
                .connect(url),
        )?;

        tracing::debug!(max_connections, ?acquire_timeout, "connected to database");
        Ok(Self { runtime, pool })
    }
}

impl QueryExecutor for PgExecutor {
    fn execute(&self, query: &Query) -> Result<u64, ExecutorError> {
        self.runtime
            .block_on(async {
                let mut rows = sqlx::query(CPU_STATS_QUERY)
                    .bind(query.host.as_str())
                    .bind(query.start)
                    .bind(query.end)
                    .fetch(&self.pool);

                let mut count = 0u64;
                while rows.try_next().await?.is_some() {
                    count += 1;
                }
                Ok::<_, sqlx::Error>(count)
            })
            .map_err(Into::into)
    }
}
