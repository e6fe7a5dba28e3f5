use tokio::fs;
use tracing::debug;

use crate::error::{Result, ValidationError};

/// Where a target's bytes come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Fetched over HTTP(S)
    Remote,
    /// Read from the local filesystem
    Local,
}

impl TargetKind {
    pub fn classify(target: &str) -> Self {
        if target.starts_with("http://") || target.starts_with("https://") {
            TargetKind::Remote
        } else {
            TargetKind::Local
        }
    }
}

/// Supplies the text of a target before it is submitted for validation
pub trait ContentSource {
    async fn load(&self, target: &str) -> Result<String>;
}

/// Default content source: remote targets are fetched over HTTP, anything
/// else is read from disk. Empty content is returned as `Ok("")`; the runner
/// owns the empty-content policy.
pub struct FetchContentSource {
    client: reqwest::Client,
}

impl FetchContentSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ContentSource for FetchContentSource {
    async fn load(&self, target: &str) -> Result<String> {
        match TargetKind::classify(target) {
            TargetKind::Remote => {
                debug!(url = %target, "fetching remote target");
                let response = self
                    .client
                    .get(target)
                    .send()
                    .await
                    .map_err(|e| fetch_error(target, e))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(ValidationError::Fetch {
                        target: target.to_string(),
                        details: format!(
                            "HTTP {}: {}",
                            status.as_u16(),
                            status.canonical_reason().unwrap_or("Unknown")
                        ),
                    });
                }

                response.text().await.map_err(|e| fetch_error(target, e))
            }
            TargetKind::Local => {
                debug!(path = %target, "reading local target");
                fs::read_to_string(target)
                    .await
                    .map_err(|e| fetch_error(target, e))
            }
        }
    }
}

fn fetch_error(target: &str, error: impl std::fmt::Display) -> ValidationError {
    ValidationError::Fetch {
        target: target.to_string(),
        details: error.to_string(),
    }
}
