//! Query Parameter Loading
//!
//! Reads `hostname,start,end` rows from a CSV file (or stdin) and turns them
//! into a ready-to-claim [`TaskQueue`].

use chrono::{DateTime, NaiveDateTime, Utc};
use querybench_core::{GroupOrder, Query, TaskQueue, WorkGroup};
use std::io::Read;
use std::path::PathBuf;
use thiserror::Error;

/// chrono format for the start and end columns
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const HEADER_HOST: &str = "hostname";

/// Errors raised while reading query parameters
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be opened
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Path given on the command line
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed (I/O or invalid UTF-8)
    #[error("error reading CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A row did not have exactly three fields
    #[error("expected CSV row to contain 3 values: got {0}")]
    FieldCount(usize),

    /// Unparseable start timestamp
    #[error("start time must be formatted like YYYY-MM-DD hh:mm:ss, not {0}")]
    StartTime(String),

    /// Unparseable end timestamp
    #[error("end time must be formatted like YYYY-MM-DD hh:mm:ss, not {0}")]
    EndTime(String),

    /// The input held no queries
    #[error("no input queries given")]
    Empty,
}

/// Parse every query row from `reader`, in input order.
///
/// A leading `hostname,...` header row is skipped. An empty input yields an
/// empty vector; callers decide whether that is an error.
pub fn load_queries<R: Read>(reader: R) -> Result<Vec<Query>, LoadError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut queries = Vec::new();
    for (index, record) in csv.records().enumerate() {
        let record = record?;
        if index == 0 && record.get(0) == Some(HEADER_HOST) {
            continue;
        }
        if record.len() != 3 {
            return Err(LoadError::FieldCount(record.len()));
        }

        let start = parse_time(&record[1]).ok_or_else(|| LoadError::StartTime(record[1].to_string()))?;
        let end = parse_time(&record[2]).ok_or_else(|| LoadError::EndTime(record[2].to_string()))?;
        queries.push(Query::new(&record[0], start, end));
    }

    Ok(queries)
}

/// Load, partition and enqueue the queries found at `path`.
///
/// `-` or an empty path reads standard input.
pub fn load_work(path: &str, order: GroupOrder) -> Result<TaskQueue, LoadError> {
    let queries = if path.is_empty() || path == "-" {
        load_queries(std::io::stdin().lock())?
    } else {
        let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
            path: PathBuf::from(path),
            source,
        })?;
        load_queries(std::io::BufReader::new(file))?
    };

    if queries.is_empty() {
        return Err(LoadError::Empty);
    }

    let groups = WorkGroup::partition(queries, order);
    tracing::debug!(
        hosts = groups.len(),
        largest = groups.first().map(WorkGroup::len).unwrap_or(0),
        "partitioned queries by host"
    );
    Ok(TaskQueue::new(groups))
}

fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn load(input: &str) -> Result<Vec<Query>, LoadError> {
        load_queries(input.as_bytes())
    }

    #[test]
    fn test_load_with_header() {
        let queries = load(
            "hostname,start_time,end_time\n\
             host_000008,2017-01-01 08:59:22,2017-01-01 09:59:22\n\
             host_000001,2017-01-02 13:02:02,2017-01-02 14:02:02\n",
        )
        .unwrap();

        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].host, "host_000008");
        assert_eq!(queries[0].start, Utc.with_ymd_and_hms(2017, 1, 1, 8, 59, 22).unwrap());
        assert_eq!(queries[0].end, Utc.with_ymd_and_hms(2017, 1, 1, 9, 59, 22).unwrap());
        assert_eq!(queries[1].host, "host_000001");
    }

    #[test]
    fn test_load_without_header() {
        let queries = load("host_000002,2017-01-01 00:00:00,2017-01-01 01:00:00\n").unwrap();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].host, "host_000002");
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert!(load("hostname,start_time,end_time\n").unwrap().is_empty());
        assert!(load("").unwrap().is_empty());
    }

    #[test]
    fn test_unrecognised_header_is_data() {
        let err = load("host,start,end\n").unwrap_err();
        assert!(matches!(err, LoadError::StartTime(ref v) if v == "start"));
    }

    #[test]
    fn test_field_count() {
        let err = load("host_000001,2017-01-01 00:00:00,2017-01-01 01:00:00,extra\n").unwrap_err();
        assert!(matches!(err, LoadError::FieldCount(4)));
        assert_eq!(err.to_string(), "expected CSV row to contain 3 values: got 4");

        let err = load("host_000001,2017-01-01 00:00:00\n").unwrap_err();
        assert!(matches!(err, LoadError::FieldCount(2)));

        let err = load("{foo\tbar\tbaz}\n").unwrap_err();
        assert!(matches!(err, LoadError::FieldCount(1)));
    }

    #[test]
    fn test_bad_timestamps() {
        let err = load("host_000001,2017-01-01,2017-01-01 01:00:00\n").unwrap_err();
        assert!(matches!(err, LoadError::StartTime(ref v) if v == "2017-01-01"));
        assert_eq!(
            err.to_string(),
            "start time must be formatted like YYYY-MM-DD hh:mm:ss, not 2017-01-01"
        );

        let err = load("host_000001,2017-01-01 00:00:00,2017-13-01 01:00:00\n").unwrap_err();
        assert!(matches!(err, LoadError::EndTime(_)));

        let err = load("host_000001,2017-01-01 00:00:00Z07:00,2017-01-01 01:00:00\n").unwrap_err();
        assert!(matches!(err, LoadError::StartTime(_)));
    }

    #[test]
    fn test_error_stops_at_first_bad_row() {
        let err = load(
            "host_000001,2017-01-01 00:00:00,2017-01-01 01:00:00\n\
             host_000002,yesterday,2017-01-01 01:00:00\n\
             host_000003,2017-01-01 00:00:00\n",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::StartTime(ref v) if v == "yesterday"));
    }

    #[test]
    fn test_load_work_missing_file() {
        let err = load_work("/nonexistent/querybench/params.csv", GroupOrder::default()).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().starts_with("failed to open /nonexistent/querybench/params.csv"));
    }

    #[test]
    fn test_load_work_groups_file() {
        let path = std::env::temp_dir().join(format!("querybench-loader-{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "hostname,start_time,end_time\n\
             host_a,2017-01-01 00:00:00,2017-01-01 01:00:00\n\
             host_b,2017-01-01 00:00:00,2017-01-01 01:00:00\n\
             host_b,2017-01-01 02:00:00,2017-01-01 03:00:00\n",
        )
        .unwrap();

        let queue = load_work(path.to_str().unwrap(), GroupOrder::LargestFirst).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.query_count(), 3);
        assert_eq!(queue.groups()[0].host(), "host_b");
    }

    #[test]
    fn test_load_work_empty_file() {
        let path = std::env::temp_dir().join(format!("querybench-empty-{}.csv", std::process::id()));
        std::fs::write(&path, "hostname,start_time,end_time\n").unwrap();

        let err = load_work(path.to_str().unwrap(), GroupOrder::default()).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, LoadError::Empty));
    }
}
