use crate::config::ResponseFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output verbosity levels, in increasing order of detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Failures only
    Quiet,
    /// Standard output
    Normal,
    /// Detailed output
    Verbose,
    /// Everything, including per-target diagnostics
    Debug,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Human,
    /// JSON report
    Json,
    /// Counts only
    Summary,
}

/// Submit HTML and CSS documents to a markup validation service
#[derive(Parser, Debug, Clone)]
#[command(
    name = "validate-markup",
    about = "Submit documents to a markup validation service and report findings",
    version
)]
pub struct Cli {
    /// Files or URLs to validate, appended after any configured targets
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Path to a TOML or JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Validation service endpoint URL
    #[arg(short, long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Reply shape to expect from the service: soap, report, or auto
    #[arg(long, value_name = "FORMAT")]
    pub response_format: Option<ResponseFormat>,

    /// Pause between submissions in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(short, long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// HTTP proxy host
    #[arg(long, value_name = "HOST")]
    pub proxy_host: Option<String>,

    /// HTTP proxy port
    #[arg(long, value_name = "PORT")]
    pub proxy_port: Option<u16>,

    /// Suppress findings whose message or reason contains this text
    /// (repeatable)
    #[arg(short, long, value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all output except failures
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Get the effective verbosity level from the flags
    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Validate CLI argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if let Some(config_path) = &self.config {
            if !config_path.exists() {
                return Err(format!(
                    "Configuration file not found: {}",
                    config_path.display()
                ));
            }
        }

        Ok(())
    }
}
