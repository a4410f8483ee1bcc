#![warn(missing_docs)]
//! QueryBench CLI Library
//!
//! Command line front end for the benchmark: resolves configuration, loads the
//! query parameters, drives a [`WorkerPool`] against PostgreSQL and renders the
//! resulting [`Report`].
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     querybench_cli::run()
//! }
//! ```

mod config;
mod db;
mod formatting;
mod loader;

pub use config::*;
pub use db::{CPU_STATS_QUERY, PgExecutor};
pub use formatting::format_human_output;
pub use loader::{LoadError, TIME_FORMAT, load_queries, load_work};

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use querybench_core::{GroupOrder, Sample, WorkerPool};
use querybench_report::{
    OutputFormat, Report, ReportMeta, ReportSummary, WorkerReport, generate_json_report,
};
use querybench_stats::compute_summary;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// QueryBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "querybench")]
#[command(author, version, about = "QueryBench - concurrent time-range query benchmark for TimescaleDB")]
pub struct Cli {
    /// Number of concurrent workers (default: available parallelism)
    #[arg(short = 'n', long)]
    pub workers: Option<usize>,

    /// CSV file with hostname,start,end rows; `-` reads stdin
    #[arg(short, long, default_value = "-")]
    pub file: String,

    /// PostgreSQL connection string
    #[arg(short = 'd', long = "database-url", env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Verbose output: log every query
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format: human, json
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (default: querybench.toml discovered from the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Hand out hosts in first-seen order instead of largest first
    #[arg(long)]
    pub arrival_order: bool,

    /// Print a default querybench.toml and exit
    #[arg(long)]
    pub print_config: bool,
}

/// Run the QueryBench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the QueryBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if cli.print_config {
        print!("{}", QueryBenchConfig::default_toml());
        return Ok(());
    }

    // Initialize logging; stdout is reserved for the report
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("querybench=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("querybench=info")
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match cli.config {
        Some(ref path) => QueryBenchConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => QueryBenchConfig::discover().unwrap_or_default(),
    };
    let settings = Settings::resolve(&cli, config)?;

    let queue = load_work(&cli.file, settings.order)
        .with_context(|| format!("failed to load queries from {}", display_input(&cli.file)))?;
    tracing::info!(
        queries = queue.query_count(),
        hosts = queue.len(),
        "loaded query parameters"
    );

    let executor = PgExecutor::connect(
        &settings.database_url,
        settings.workers,
        settings.connect_timeout,
    )
    .context("failed to connect to database")?;

    let pool = WorkerPool::new(queue, Arc::new(executor), settings.workers);
    let progress = (settings.format == OutputFormat::Human && !cli.verbose)
        .then(|| progress_bar(pool.query_count()));

    tracing::info!(workers = pool.workers(), "starting benchmark");
    let start = Instant::now();
    let result = pool.run_with(|_| {
        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    });
    let wall_time = start.elapsed();

    let samples = match result {
        Ok(samples) => {
            if let Some(pb) = progress {
                pb.finish_and_clear();
            }
            samples
        }
        Err(e) => {
            if let Some(pb) = progress {
                pb.abandon();
            }
            return Err(e).context("benchmark aborted");
        }
    };

    let report = build_report(&samples, wall_time, settings.workers, &cli.file);
    let output = match settings.format {
        OutputFormat::Human => format_human_output(&report),
        OutputFormat::Json => generate_json_report(&report)?,
    };

    if let Some(ref path) = settings.output {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    Ok(())
}

/// Effective run settings after layering CLI flags over the config file
#[derive(Debug, Clone)]
struct Settings {
    workers: usize,
    order: GroupOrder,
    database_url: String,
    connect_timeout: Duration,
    format: OutputFormat,
    output: Option<PathBuf>,
}

impl Settings {
    fn resolve(cli: &Cli, config: QueryBenchConfig) -> anyhow::Result<Self> {
        let workers = cli
            .workers
            .or(config.runner.workers)
            .unwrap_or_else(default_workers)
            .max(1);

        let order = if cli.arrival_order || !config.runner.largest_first {
            GroupOrder::Arrival
        } else {
            GroupOrder::LargestFirst
        };

        let connect_timeout = QueryBenchConfig::parse_duration(&config.database.connect_timeout)
            .context("invalid [database] connect_timeout")?;

        let format = cli
            .format
            .as_deref()
            .unwrap_or(config.output.format.as_str())
            .parse::<OutputFormat>()
            .map_err(anyhow::Error::msg)?;

        Ok(Self {
            workers,
            order,
            database_url: cli.database_url.clone().unwrap_or(config.database.url),
            connect_timeout,
            format,
            output: cli.output.clone().or(config.output.path.map(PathBuf::from)),
        })
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn display_input(path: &str) -> &str {
    if path.is_empty() || path == "-" {
        "stdin"
    } else {
        path
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} queries")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Assemble the report for a completed run.
///
/// # Panics
///
/// Panics if `samples` is empty; a successful run over a non-empty queue
/// always yields at least one sample.
pub fn build_report(samples: &[Sample], wall_time: Duration, workers: usize, input: &str) -> Report {
    let durations: Vec<Duration> = samples.iter().map(|s| s.duration).collect();
    let stats = compute_summary(&durations);
    let rows = samples.iter().map(|s| s.row_count).sum();

    Report {
        meta: ReportMeta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            workers,
            input: if input.is_empty() { "-".to_string() } else { input.to_string() },
        },
        summary: ReportSummary::new(&stats, rows, wall_time),
        workers: WorkerReport::from_samples(samples),
    }
}
