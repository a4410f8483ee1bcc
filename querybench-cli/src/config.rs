//! Configuration loading from querybench.toml
//!
//! QueryBench configuration can be specified in a `querybench.toml` file in the
//! project root. The configuration is automatically discovered by walking up
//! from the current directory, or passed explicitly with `--config`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const CONFIG_FILE: &str = "querybench.toml";

/// Connection string used when neither the CLI, the environment nor the config file sets one
pub const DEFAULT_DATABASE_URL: &str = "postgres://postgres:password@db/homework?sslmode=disable";

/// QueryBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QueryBenchConfig {
    /// Database connection
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Worker pool
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Report output
    #[serde(default)]
    pub output: OutputConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    #[serde(default = "default_url")]
    pub url: String,
    /// How long a worker may wait for a pooled connection (e.g., "10s")
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}
fn default_connect_timeout() -> String {
    "30s".to_string()
}

/// Worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Number of concurrent workers (default: available parallelism)
    #[serde(default)]
    pub workers: Option<usize>,
    /// Hand out the hosts with the most queries first
    #[serde(default = "default_largest_first")]
    pub largest_first: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: None,
            largest_first: default_largest_first(),
        }
    }
}

fn default_largest_first() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Write the report here instead of stdout
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl QueryBenchConfig {
    /// Read and parse `path`
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&text)?)
    }

    /// Nearest `querybench.toml` in the current directory or any parent.
    ///
    /// A file that exists but fails to parse counts as not found.
    pub fn discover() -> Option<Self> {
        let cwd = std::env::current_dir().ok()?;
        let path = cwd
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())?;
        Self::load(path).ok()
    }

    /// Commented default config, as printed by `--print-config`
    pub fn default_toml() -> String {
        r#"# QueryBench Configuration

[database]
# PostgreSQL / TimescaleDB connection string
url = "postgres://postgres:password@db/homework?sslmode=disable"
# Maximum wait for a pooled connection
connect_timeout = "30s"

[runner]
# Number of concurrent workers (uncomment to override available parallelism)
# workers = 8
# Run hosts with the most queries first to reduce idle workers at the tail
largest_first = true

[output]
# Output format: human or json
format = "human"
# Write the report to a file instead of stdout (uncomment to enable)
# path = "target/querybench/report.json"
"#
        .to_string()
    }

    /// Parse a duration such as `"30s"`, `"250ms"` or `"1.5m"`; a bare number is seconds
    pub fn parse_duration(text: &str) -> anyhow::Result<Duration> {
        let text = text.trim();
        anyhow::ensure!(!text.is_empty(), "empty duration");

        let split = text
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let (number, unit) = text.split_at(split);

        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid duration {text:?}"))?;
        let nanos_per_unit = match unit {
            "" | "s" => 1e9,
            "ns" => 1.0,
            "us" => 1e3,
            "ms" => 1e6,
            "m" | "min" => 60e9,
            other => anyhow::bail!("unknown duration unit {other:?} in {text:?}"),
        };

        let nanos = value * nanos_per_unit;
        anyhow::ensure!(
            nanos.is_finite() && nanos >= 0.0 && nanos <= u64::MAX as f64,
            "duration {text:?} out of range"
        );
        Ok(Duration::from_nanos(nanos.round() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueryBenchConfig::default();
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.database.connect_timeout, "30s");
        assert!(config.runner.workers.is_none());
        assert!(config.runner.largest_first);
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_parse_duration() {
        let parse = |s| QueryBenchConfig::parse_duration(s).unwrap();
        assert_eq!(parse("30s"), Duration::from_secs(30));
        assert_eq!(parse("250ms"), Duration::from_millis(250));
        assert_eq!(parse("100us"), Duration::from_micros(100));
        assert_eq!(parse("2m"), Duration::from_secs(120));
        assert_eq!(parse("1.5s"), Duration::from_millis(1500));
        assert_eq!(parse(" 10 "), Duration::from_secs(10));

        assert!(QueryBenchConfig::parse_duration("").is_err());
        assert!(QueryBenchConfig::parse_duration("5h").is_err());
        assert!(QueryBenchConfig::parse_duration("soon").is_err());
        assert!(QueryBenchConfig::parse_duration("-3s").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [database]
            url = "postgres://bench@localhost/cpu"

            [runner]
            workers = 12
            largest_first = false
        "#;

        let config: QueryBenchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database.url, "postgres://bench@localhost/cpu");
        assert_eq!(config.runner.workers, Some(12));
        assert!(!config.runner.largest_first);
        // Defaults should still apply
        assert_eq!(config.database.connect_timeout, "30s");
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_default_toml_parses() {
        let config: QueryBenchConfig = toml::from_str(&QueryBenchConfig::default_toml()).unwrap();
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert!(config.runner.largest_first);
        assert!(config.output.path.is_none());
    }
}
