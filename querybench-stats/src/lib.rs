#![warn(missing_docs)]
//! QueryBench Statistical Engine
//!
//! Turns an unordered set of query latencies into a summary report:
//! - Nearest-rank percentiles with boundary averaging (median, p95)
//! - Exact min/max/total/mean as durations
//! - Numerically stable standard deviation (Welford)

mod percentiles;
mod summary;

pub use percentiles::percentile;
pub use summary::{SummaryStats, compute_summary};

/// Percentile reported as the tail latency
pub const TAIL_PERCENTILE: f64 = 0.95;
