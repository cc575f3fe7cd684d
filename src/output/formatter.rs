//! Output formatters for property results
//!
//! Provides summary, table and JSON renderings.

use serde::Serialize;

use crate::models::{HostStatus, Verdict};
use crate::results::CounterSnapshot;

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "summary" => Some(OutputFormat::Summary),
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Inputs for one human-readable result line
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportLine {
    pub status: HostStatus,
    pub name: String,
    pub verdict: Verdict,
    pub verbosity: u8,
}

impl ReportLine {
    /// Verdict text at this line's verbosity
    ///
    /// Verbosity 0 leaves out failure messages and exception causes.
    pub fn detail(&self) -> String {
        if self.verbosity > 0 {
            return self.verdict.to_string();
        }
        match &self.verdict {
            Verdict::Failed { succeeded, .. } => {
                format!("Falsified after {succeeded} passed tests.")
            }
            Verdict::PropException { .. } => "Exception raised on property evaluation.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format a single report line
    pub fn format_report(&self, line: &ReportLine) -> String {
        match self.format {
            OutputFormat::Summary => {
                format!("{} {}: {}", line.status.symbol(), line.name, line.detail())
            }
            OutputFormat::Table => self.format_report_table(line),
            OutputFormat::Json => serde_json::to_string(line).unwrap_or_default(),
        }
    }

    fn format_report_table(&self, line: &ReportLine) -> String {
        let status_str = if self.colorize {
            match line.status {
                HostStatus::Success => "\x1b[32m+ OK   \x1b[0m",
                HostStatus::Failure => "\x1b[31m! FAIL \x1b[0m",
                HostStatus::Error => "\x1b[31mx ERROR\x1b[0m",
                HostStatus::Skipped => "\x1b[33m- SKIP \x1b[0m",
            }
        } else {
            match line.status {
                HostStatus::Success => "+ OK   ",
                HostStatus::Failure => "! FAIL ",
                HostStatus::Error => "x ERROR",
                HostStatus::Skipped => "- SKIP ",
            }
        };

        format!("{} {:30} {}", status_str, line.name, line.detail())
    }

    /// Format the session summary
    pub fn format_counters(&self, counters: &CounterSnapshot) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string(counters).unwrap_or_default(),
            OutputFormat::Table if self.colorize => {
                let color = if counters.is_passed() { "32" } else { "31" };
                format!("\x1b[{color}m{counters}\x1b[0m")
            }
            _ => counters.to_string(),
        }
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(status: HostStatus, verdict: Verdict, verbosity: u8) -> ReportLine {
        ReportLine {
            status,
            name: "reverse".to_string(),
            verdict,
            verbosity,
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::from_str("csv"), None);
    }

    #[test]
    fn test_summary_lines() {
        let formatter = ResultFormatter::default();
        assert_eq!(
            formatter.format_report(&line(HostStatus::Success, Verdict::passed(100), 0)),
            "+ reverse: OK, passed 100 tests."
        );
        assert_eq!(
            formatter.format_report(&line(HostStatus::Failure, Verdict::failed(3, "x=0"), 0)),
            "! reverse: Falsified after 3 passed tests."
        );
    }

    #[test]
    fn test_verbosity_adds_detail() {
        let formatter = ResultFormatter::default();
        assert_eq!(
            formatter.format_report(&line(HostStatus::Failure, Verdict::failed(3, "x=0"), 1)),
            "! reverse: Falsified after 3 passed tests: x=0"
        );
        assert_eq!(
            formatter.format_report(&line(HostStatus::Error, Verdict::exception("boom"), 0)),
            "x reverse: Exception raised on property evaluation."
        );
    }

    #[test]
    fn test_table_without_color() {
        let formatter = ResultFormatter::new(OutputFormat::Table).no_color();
        let output = formatter.format_report(&line(HostStatus::Success, Verdict::Proved, 0));
        assert!(output.starts_with("+ OK"));
        assert!(output.ends_with("OK, proved property."));
    }

    #[test]
    fn test_counters_json() {
        let formatter = ResultFormatter::new(OutputFormat::Json);
        let output = formatter.format_counters(&CounterSnapshot::new(3, 2, 1, 0));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["failure"], 1);
    }
}
