use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Proxy};
use tracing::debug;

use crate::config::ResponseFormat;
use crate::error::{Result, ValidationError};

/// Transport settings for the submission client
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Optional HTTP proxy host
    pub proxy_host: Option<String>,
    /// Optional HTTP proxy port
    pub proxy_port: Option<u16>,
    /// User agent string
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            proxy_host: None,
            proxy_port: None,
            user_agent: format!("validate-markup/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    /// Build the HTTP client used for submissions and content fetching
    pub fn build_client(&self) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .user_agent(&self.user_agent);

        if let (Some(host), Some(port)) = (&self.proxy_host, self.proxy_port) {
            builder = builder.proxy(Proxy::all(format!("http://{host}:{port}"))?);
        }

        Ok(builder.build()?)
    }
}

/// One round trip against the validator: content in, raw response body out
pub trait Submitter {
    async fn submit(&self, content: &[u8], target: &str) -> Result<String>;
}

/// Submits content to the validation service as a multipart upload.
///
/// The form carries the fixed metadata fields the service expects
/// (`outline=1`, `charset=UTF-8`, `doctype=inline`) plus the document under
/// the `uploaded_file` part. When the structured reply is wanted the form
/// additionally asks for `output=soap12`; without it the service answers
/// with its HTML report page.
pub struct UploadSubmitter {
    client: Client,
    endpoint: String,
    format: ResponseFormat,
    timeout_seconds: u64,
}

impl UploadSubmitter {
    pub fn new(
        endpoint: impl Into<String>,
        format: ResponseFormat,
        transport: &TransportConfig,
    ) -> Result<Self> {
        Ok(Self {
            client: transport.build_client()?,
            endpoint: endpoint.into(),
            format,
            timeout_seconds: transport.timeout_seconds,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The underlying reqwest client, shareable with the content source
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn network_error(&self, error: reqwest::Error) -> ValidationError {
        if error.is_timeout() {
            ValidationError::Timeout {
                url: self.endpoint.clone(),
                timeout_seconds: self.timeout_seconds,
            }
        } else {
            ValidationError::Http(error)
        }
    }
}

impl Submitter for UploadSubmitter {
    async fn submit(&self, content: &[u8], target: &str) -> Result<String> {
        let mut form = Form::new()
            .text("outline", "1")
            .text("charset", "UTF-8")
            .text("doctype", "inline");
        if self.format.requests_structured() {
            form = form.text("output", "soap12");
        }
        let part = Part::bytes(content.to_vec()).file_name(upload_filename(target));
        let form = form.part("uploaded_file", part);

        debug!(url = %self.endpoint, source = %target, "submitting for validation");
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ValidationError::HttpStatus {
                url: self.endpoint.clone(),
                status: status.as_u16(),
                message: format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        response.text().await.map_err(|e| self.network_error(e))
    }
}

/// Filename reported for the uploaded part. Directory-style targets upload
/// as their index document.
fn upload_filename(target: &str) -> String {
    if target.ends_with('/') {
        format!("{target}index.html")
    } else {
        target.to_string()
    }
}
