//! Per-Query Samples

use std::fmt;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Identity of a pool worker, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId(NonZeroUsize);

impl WorkerId {
    /// Worker id from a 1-based index; `None` for 0
    pub fn new(id: usize) -> Option<Self> {
        NonZeroUsize::new(id).map(Self)
    }

    /// Worker id for the worker at 0-based pool position `index`
    pub fn from_index(index: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(index))
    }

    /// Numeric value (always >= 1)
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Measured outcome of one executed query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Worker that ran the query
    pub worker_id: WorkerId,
    /// Host the query was for
    pub host: String,
    /// Rows returned by the data store
    pub row_count: u64,
    /// Wall-clock time of the executor call, from a monotonic clock
    pub duration: Duration,
}

impl Sample {
    /// Duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}
