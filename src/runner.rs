//! Sequential Validation Engine
//!
//! This module coordinates a batch run: targets are validated strictly in
//! submission order with a fixed pause between requests, and a failure on one
//! target never stops the rest of the run.

use crate::config::{Config, ConfigManager, ResponseFormat};
use crate::content::ContentSource;
use crate::error::{Result, ValidationError};
use crate::filter::MessageFilter;
use crate::finding::{Finding, ResultSet};
use crate::submit::Submitter;
use crate::{scrape, soap};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Settings controlling a validation run
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    /// Validator endpoint URL; empty means unset
    pub endpoint: String,
    /// Which reply shape to expect
    pub response_format: ResponseFormat,
    /// Message substrings to suppress
    pub ignore: Vec<String>,
    /// Pause between consecutive submissions
    pub delay: Duration,
}

impl RunnerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            endpoint: config.service.endpoint.clone(),
            response_format: config.service.response_format,
            ignore: config.ignore.clone(),
            delay: ConfigManager::get_delay_duration(config),
        }
    }
}

/// Drives a validation run: loads each target, submits it to the service,
/// parses the reply into findings, and applies the ignore filter. Targets are
/// processed strictly in order with a fixed pause between submissions.
pub struct Runner<C, S> {
    source: C,
    submitter: S,
    settings: RunnerSettings,
    filter: MessageFilter,
}

impl<C: ContentSource, S: Submitter> Runner<C, S> {
    pub fn new(source: C, submitter: S, settings: RunnerSettings) -> Self {
        let filter = MessageFilter::new(settings.ignore.clone());
        Self {
            source,
            submitter,
            settings,
            filter,
        }
    }

    /// Validate every target in order, collecting findings into one result
    /// set. A failure on one target is recorded as an error finding and does
    /// not stop the rest of the run. With no endpoint configured, the run
    /// produces a single error finding and submits nothing.
    pub async fn run(&self, targets: &[String]) -> ResultSet {
        let mut results = ResultSet::new();

        if self.settings.endpoint.is_empty() {
            let error = ValidationError::MissingEndpoint {
                key: "service.endpoint".to_string(),
            };
            warn!("{error}");
            results.push(Finding::error("configuration", error.to_string()));
            return results;
        }

        for (index, target) in targets.iter().enumerate() {
            if index > 0 && !self.settings.delay.is_zero() {
                tokio::time::sleep(self.settings.delay).await;
            }

            info!(source = %target, "validating");
            match self.validate_target(target).await {
                Ok(findings) => results.extend(findings),
                Err(error) => {
                    warn!(source = %target, "validation failed: {error}");
                    results.push(Finding::from_error(target, &error));
                }
            }
        }

        results
    }

    /// Load, submit, and parse a single target
    async fn validate_target(&self, target: &str) -> Result<Vec<Finding>> {
        let content = self.source.load(target).await?;

        if content.is_empty() {
            debug!(source = %target, "skipping submission of empty content");
            return Ok(vec![Finding::error(target, "File response is empty")]);
        }

        let body = self.submitter.submit(content.as_bytes(), target).await?;
        let findings = self.parse_response(target, &body)?;
        Ok(self.filter.apply_all(findings))
    }

    /// Parse a service reply according to the configured response format,
    /// sniffing the body shape when the format is `Auto`
    fn parse_response(&self, target: &str, body: &str) -> Result<Vec<Finding>> {
        let format = match self.settings.response_format {
            ResponseFormat::Auto => sniff_format(body),
            format => format,
        };

        match format {
            ResponseFormat::Report => {
                debug!(source = %target, "parsing scraped report");
                Ok(scrape::parse(target, body))
            }
            _ => {
                debug!(source = %target, "parsing structured reply");
                soap::parse(target, body)
            }
        }
    }
}

/// Guess the reply shape from the start of the body. HTML documents go to the
/// report scraper; everything else is treated as the structured reply.
fn sniff_format(body: &str) -> ResponseFormat {
    let head: String = body
        .trim_start()
        .chars()
        .take(64)
        .collect::<String>()
        .to_ascii_lowercase();

    if head.starts_with("<!doctype") || head.starts_with("<html") {
        ResponseFormat::Report
    } else {
        ResponseFormat::Soap
    }
}
