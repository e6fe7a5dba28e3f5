//! # validate-markup Library
//!
//! An async Rust client for remote markup-validation services: it uploads
//! HTML and CSS documents as multipart form posts, parses the structured
//! SOAP reply or the scraped HTML report page into findings, and aggregates
//! them over a batch of targets with a fixed pause between submissions.

pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod filter;
pub mod finding;
pub mod output;
pub mod runner;
pub mod scrape;
pub mod soap;
pub mod submit;

pub use cli::{Cli, OutputFormat, VerbosityLevel};
pub use config::{Config, ConfigManager, ResponseFormat};
pub use content::{ContentSource, FetchContentSource, TargetKind};
pub use error::{Result, ValidationError};
pub use filter::{IGNORED_PREFIX, MessageFilter};
pub use finding::{Finding, Outcome, ResultSet, RunSummary};
pub use output::Output;
pub use runner::{Runner, RunnerSettings};
pub use submit::{Submitter, TransportConfig, UploadSubmitter};

/// Wire up the production content source and submitter for a configuration
/// and validate its targets. The submitter and the content fetcher share one
/// HTTP client so the timeout and proxy settings apply to both.
pub async fn run(config: &Config) -> Result<ResultSet> {
    let transport = ConfigManager::get_transport_config(config);
    let submitter = UploadSubmitter::new(
        &config.service.endpoint,
        config.service.response_format,
        &transport,
    )?;
    let source = FetchContentSource::new(submitter.client().clone());
    let runner = Runner::new(source, submitter, RunnerSettings::from_config(config));

    Ok(runner.run(&config.targets).await)
}
