//! Output Formatting
//!
//! Human-readable rendering of a [`Report`]: run totals, the latency summary,
//! and a per-worker breakdown.

use querybench_report::Report;

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let summary = &report.summary;
    let mut output = String::new();

    output.push_str(&format!(
        "Executed {} queries in {:.2} seconds\n",
        summary.queries,
        summary.wall_time_ms / 1000.0
    ));
    output.push_str(&format!(
        "Total execution time for all queries was {:.2} seconds, using {} worker threads. \
         Parallel speedup of {:.1}x\n",
        summary.total_query_time_ms / 1000.0,
        report.meta.workers,
        summary.parallel_speedup
    ));
    output.push_str(&format!("Rows returned: {}\n", summary.rows));
    output.push('\n');

    output.push_str(&format!("min query duration={:.2}ms\n", summary.min_ms));
    output.push_str(&format!("max query duration={:.2}ms\n", summary.max_ms));
    output.push_str(&format!("average={:.2}ms\n", summary.average_ms));
    output.push_str(&format!("median={:.2}ms\n", summary.median_ms));
    output.push_str(&format!("95th percentile={:.2}ms\n", summary.p95_ms));
    output.push_str(&format!("standard deviation={:.2}ms\n", summary.std_dev_ms));

    if !report.workers.is_empty() {
        output.push('\n');
        output.push_str(&format!(
            "{:>8} {:>10} {:>12} {:>12}\n",
            "worker", "queries", "rows", "busy (ms)"
        ));
        output.push_str(&"-".repeat(45));
        output.push('\n');
        for worker in &report.workers {
            output.push_str(&format!(
                "{:>8} {:>10} {:>12} {:>12.2}\n",
                worker.worker_id, worker.queries, worker.rows, worker.busy_ms
            ));
        }
    }

    output
}
