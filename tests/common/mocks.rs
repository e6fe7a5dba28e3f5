use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use validate_markup::{ContentSource, Result, Submitter, ValidationError};

/// One submission accepted by the mock validation service
#[derive(Clone, Debug)]
pub struct SubmissionRecord {
    pub target: String,
    pub content_length: usize,
    pub timestamp: Instant,
}

#[derive(Clone, Debug)]
pub enum MockFailure {
    Timeout,
    ServiceError(u16),
}

/// Mock validation service for testing runs without network calls.
///
/// Responses are keyed by target; a default response covers everything else.
/// Every call is recorded with a timestamp so tests can assert submission
/// order, counts, and pacing. Clones share the same state, so a test can
/// hand one handle to the runner and keep another for assertions.
#[derive(Clone)]
pub struct MockSubmitter {
    responses: Arc<Mutex<HashMap<String, String>>>,
    default_response: Arc<Mutex<Option<String>>>,
    failures: Arc<Mutex<HashMap<String, MockFailure>>>,
    submission_log: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl MockSubmitter {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            failures: Arc::new(Mutex::new(HashMap::new())),
            submission_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_default_response(body: &str) -> Self {
        let mock = Self::new();
        *mock.default_response.lock().unwrap() = Some(body.to_string());
        mock
    }

    pub fn add_response(&self, target: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(target.to_string(), body.to_string());
    }

    pub fn add_failure(&self, target: &str, failure: MockFailure) {
        self.failures
            .lock()
            .unwrap()
            .insert(target.to_string(), failure);
    }

    pub fn submission_log(&self) -> Vec<SubmissionRecord> {
        self.submission_log.lock().unwrap().clone()
    }

    pub fn submission_count(&self) -> usize {
        self.submission_log.lock().unwrap().len()
    }
}

impl Submitter for MockSubmitter {
    async fn submit(&self, content: &[u8], target: &str) -> Result<String> {
        self.submission_log.lock().unwrap().push(SubmissionRecord {
            target: target.to_string(),
            content_length: content.len(),
            timestamp: Instant::now(),
        });

        let failure = self.failures.lock().unwrap().get(target).cloned();
        if let Some(failure) = failure {
            return Err(match failure {
                MockFailure::Timeout => ValidationError::Timeout {
                    url: "mock://validator".to_string(),
                    timeout_seconds: 30,
                },
                MockFailure::ServiceError(status) => ValidationError::HttpStatus {
                    url: "mock://validator".to_string(),
                    status,
                    message: format!("HTTP {}", status),
                },
            });
        }

        let response = self.responses.lock().unwrap().get(target).cloned();
        if let Some(body) = response {
            return Ok(body);
        }

        let default = self.default_response.lock().unwrap().clone();
        if let Some(body) = default {
            return Ok(body);
        }

        Err(ValidationError::HttpStatus {
            url: "mock://validator".to_string(),
            status: 404,
            message: "Not Found".to_string(),
        })
    }
}

/// Mock content source backed by an in-memory map instead of disk and HTTP
#[derive(Clone)]
pub struct MockContentSource {
    targets: Arc<Mutex<HashMap<String, String>>>,
    load_log: Arc<Mutex<Vec<String>>>,
}

impl MockContentSource {
    pub fn new() -> Self {
        Self {
            targets: Arc::new(Mutex::new(HashMap::new())),
            load_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_target(&self, target: &str, content: &str) {
        self.targets
            .lock()
            .unwrap()
            .insert(target.to_string(), content.to_string());
    }

    pub fn load_log(&self) -> Vec<String> {
        self.load_log.lock().unwrap().clone()
    }
}

impl ContentSource for MockContentSource {
    async fn load(&self, target: &str) -> Result<String> {
        self.load_log.lock().unwrap().push(target.to_string());

        self.targets
            .lock()
            .unwrap()
            .get(target)
            .cloned()
            .ok_or_else(|| ValidationError::Fetch {
                target: target.to_string(),
                details: "target not configured in mock".to_string(),
            })
    }
}
