//! Report Data Structures

use chrono::{DateTime, Utc};
use querybench_core::{Sample, WorkerId};
use querybench_stats::SummaryStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Complete benchmark report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    pub workers: Vec<WorkerReport>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// Number of pool workers
    pub workers: usize,
    /// Input file, or `-` for stdin
    pub input: String,
}

/// Aggregate latency metrics, durations in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub queries: usize,
    pub rows: u64,
    pub wall_time_ms: f64,
    pub total_query_time_ms: f64,
    /// Total query time over wall time
    pub parallel_speedup: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub average_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub std_dev_ms: f64,
}

impl ReportSummary {
    /// Build from computed stats, the total returned rows, and the run's wall time
    pub fn new(stats: &SummaryStats, rows: u64, wall_time: Duration) -> Self {
        Self {
            queries: stats.count,
            rows,
            wall_time_ms: wall_time.as_secs_f64() * 1000.0,
            total_query_time_ms: stats.total_ms(),
            parallel_speedup: stats.parallel_speedup(wall_time),
            min_ms: stats.min_ms(),
            max_ms: stats.max_ms(),
            average_ms: stats.average_ms(),
            median_ms: stats.median_ms(),
            p95_ms: stats.p95_ms(),
            std_dev_ms: stats.std_dev,
        }
    }
}

/// Per-worker totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub queries: usize,
    pub rows: u64,
    /// Time spent inside executor calls
    pub busy_ms: f64,
}

impl WorkerReport {
    /// Per-worker totals from raw samples, ordered by worker id
    pub fn from_samples(samples: &[Sample]) -> Vec<WorkerReport> {
        let mut totals: BTreeMap<WorkerId, (usize, u64, Duration)> = BTreeMap::new();
        for sample in samples {
            let entry = totals.entry(sample.worker_id).or_default();
            entry.0 += 1;
            entry.1 += sample.row_count;
            entry.2 += sample.duration;
        }

        totals
            .into_iter()
            .map(|(worker_id, (queries, rows, busy))| WorkerReport {
                worker_id: worker_id.get(),
                queries,
                rows,
                busy_ms: busy.as_secs_f64() * 1000.0,
            })
            .collect()
    }
}
