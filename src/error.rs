use thiserror::Error;

/// Main application error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status error: {status} for {url} - {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Request timeout: {url} after {timeout_seconds} seconds")]
    Timeout { url: String, timeout_seconds: u64 },

    #[error("Missing configuration value: {key}")]
    MissingEndpoint { key: String },

    #[error("Failed to load {target}: {details}")]
    Fetch { target: String, details: String },

    #[error("Malformed validator response: {details}")]
    MalformedResponse { details: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let status_error = ValidationError::HttpStatus {
            url: "https://validator.example.com/check".to_string(),
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert!(status_error.to_string().contains("503"));
        assert!(status_error.to_string().contains("validator.example.com"));

        let timeout_error = ValidationError::Timeout {
            url: "https://validator.example.com/check".to_string(),
            timeout_seconds: 30,
        };
        assert!(timeout_error.to_string().contains("30 seconds"));

        let fetch_error = ValidationError::Fetch {
            target: "pages/index.html".to_string(),
            details: "No such file or directory".to_string(),
        };
        assert!(fetch_error.to_string().contains("pages/index.html"));
        assert!(fetch_error.to_string().contains("No such file"));
    }

    #[test]
    fn test_missing_endpoint_names_key() {
        let error = ValidationError::MissingEndpoint {
            key: "service.endpoint".to_string(),
        };
        assert!(error.to_string().contains("service.endpoint"));
        assert!(error.to_string().contains("Missing configuration value"));
    }

    #[test]
    fn test_malformed_response_display() {
        let error = ValidationError::MalformedResponse {
            details: "unexpected end of stream at byte 12".to_string(),
        };
        assert!(error.to_string().contains("Malformed validator response"));
        assert!(error.to_string().contains("byte 12"));
    }

    #[test]
    fn test_result_type_alias() {
        let success: Result<String> = Ok("success".to_string());
        assert!(success.is_ok());

        let failure: Result<String> = Err(ValidationError::MissingEndpoint {
            key: "service.endpoint".to_string(),
        });
        assert!(failure.is_err());
    }
}
