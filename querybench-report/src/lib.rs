//! QueryBench Report - Output Formats
//!
//! The serializable report model plus its renderings:
//! - JSON (machine-readable)
//! - Human-readable text is produced by the CLI from the same model

mod json;
mod report;

pub use json::generate_json_report;
pub use report::{Report, ReportMeta, ReportSummary, WorkerReport};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
