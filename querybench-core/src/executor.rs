//! Query Executor Capability

use crate::query::Query;

/// Error returned by an executor, surfaced verbatim to the caller
pub type ExecutorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Runs one query against the data store and reports how many rows came back.
///
/// Called concurrently from every pool worker, so implementations must be
/// `Send + Sync` and use independent connections per call. The call blocks the
/// worker until the store answers; timing is taken around it by the pool.
pub trait QueryExecutor: Send + Sync {
    /// Execute `query` and return the number of result rows
    fn execute(&self, query: &Query) -> Result<u64, ExecutorError>;
}

impl<F> QueryExecutor for F
where
    F: Fn(&Query) -> Result<u64, ExecutorError> + Send + Sync,
{
    fn execute(&self, query: &Query) -> Result<u64, ExecutorError> {
        self(query)
    }
}
