//! Output and Reporting
//!
//! This module formats validation findings for the terminal in
//! human-readable, JSON, and summary-only forms.

use atty;
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;

use crate::cli::{OutputFormat, VerbosityLevel};
use crate::finding::{Finding, Outcome, ResultSet, RunSummary};

/// Output formatter for validation results
pub struct Output {
    format: OutputFormat,
    verbosity: VerbosityLevel,
    show_colors: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbosity: VerbosityLevel) -> Self {
        Self {
            format,
            verbosity,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    /// Constructor with explicit color control, used by tests and by callers
    /// that pipe output
    pub fn with_colors(
        format: OutputFormat,
        verbosity: VerbosityLevel,
        show_colors: bool,
    ) -> Self {
        Self {
            format,
            verbosity,
            show_colors,
        }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    pub fn format_results(&self, results: &ResultSet, duration: Duration) -> String {
        match self.format {
            OutputFormat::Human => self.format_human(results, duration),
            OutputFormat::Json => self.format_json(results, duration),
            OutputFormat::Summary => self.format_summary(&results.summary(), duration),
        }
    }

    fn format_human(&self, results: &ResultSet, duration: Duration) -> String {
        let mut output = String::new();

        if self.verbosity == VerbosityLevel::Quiet {
            for finding in results {
                if matches!(finding.outcome, Outcome::Fail | Outcome::Error) {
                    output.push_str(&self.format_finding(finding));
                    output.push('\n');
                }
            }
            return output;
        }

        if self.verbosity >= VerbosityLevel::Verbose {
            output.push_str(&format!(
                "Validation run at {}\n\n",
                Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        for finding in results {
            output.push_str(&self.format_finding(finding));
            output.push('\n');
        }

        if !results.is_empty() {
            output.push('\n');
        }
        output.push_str(&self.format_summary(&results.summary(), duration));

        output
    }

    pub fn format_finding(&self, finding: &Finding) -> String {
        let label = match finding.outcome {
            Outcome::Pass => self.colorize("✓ PASS", "32"),
            Outcome::Fail => self.colorize("✗ FAIL", "31"),
            Outcome::Warning => self.colorize("! WARNING", "36"),
            Outcome::Error => self.colorize("⚠ ERROR", "33"),
        };

        let mut line = format!("{}  {}: {}", label, finding.source, finding.message);

        if finding.has_position() {
            line.push_str(&format!(
                " (line {}, column {})",
                finding.line, finding.column
            ));
        }

        if self.verbosity >= VerbosityLevel::Verbose && finding.reason != finding.message {
            line.push_str(&format!("\n    {}", finding.reason));
        }

        line
    }

    fn format_summary(&self, summary: &RunSummary, duration: Duration) -> String {
        let mut output = String::new();
        output.push_str("Validation Summary:\n");
        output.push_str(&format!("  Total findings: {}\n", summary.total));
        output.push_str(&format!(
            "  {} {}\n",
            self.colorize("Passed:", "32"),
            summary.passed
        ));

        if summary.failed > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Failed:", "31"),
                summary.failed
            ));
        }
        if summary.warnings > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Warnings:", "36"),
                summary.warnings
            ));
        }
        if summary.errors > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Errors:", "33"),
                summary.errors
            ));
        }

        if summary.total > 0 {
            let rate = summary.passed as f64 / summary.total as f64 * 100.0;
            output.push_str(&format!("  Success rate: {:.1}%\n", rate));
        }
        output.push_str(&format!("  Duration: {}\n", format_duration(duration)));

        output
    }

    fn format_json(&self, results: &ResultSet, duration: Duration) -> String {
        #[derive(Serialize)]
        struct Report<'a> {
            generated_at: String,
            duration_ms: u128,
            summary: RunSummary,
            findings: &'a [Finding],
        }

        let report = Report {
            generated_at: Utc::now().to_rfc3339(),
            duration_ms: duration.as_millis(),
            summary: results.summary(),
            findings: results.findings(),
        };

        let mut json = serde_json::to_string_pretty(&report).unwrap_or_default();
        json.push('\n');
        json
    }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{:.0}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0) as u64;
        let secs = total_secs % 60.0;
        format!("{}m{:.1}s", mins, secs)
    }
}
