//! JSON Output

use crate::report::Report;

/// Generate a prettified JSON report.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportMeta, ReportSummary, WorkerReport};
    use chrono::Utc;

    #[test]
    fn test_json_round_trips_fields() {
        let report = Report {
            meta: ReportMeta {
                version: "0.1.0".to_string(),
                timestamp: Utc::now(),
                workers: 4,
                input: "query_params.csv".to_string(),
            },
            summary: ReportSummary {
                queries: 200,
                rows: 12000,
                wall_time_ms: 512.0,
                total_query_time_ms: 2048.0,
                parallel_speedup: 4.0,
                min_ms: 1.0,
                max_ms: 40.0,
                average_ms: 10.24,
                median_ms: 9.5,
                p95_ms: 30.0,
                std_dev_ms: 6.1,
            },
            workers: vec![WorkerReport {
                worker_id: 1,
                queries: 200,
                rows: 12000,
                busy_ms: 2048.0,
            }],
        };

        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["queries"], 200);
        assert_eq!(value["meta"]["input"], "query_params.csv");
        assert_eq!(value["workers"][0]["worker_id"], 1);

        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.summary.rows, 12000);
    }
}
