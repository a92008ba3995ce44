//! Error types for the summarizer client.
//!
//! Every failure the client can produce is a [`SummarizerError`]. The
//! workflow reduces these to a [`FailureKind`] and a single human-readable
//! message before handing them to the presentation layer.

use thiserror::Error;

/// Result type alias for summarizer operations.
pub type SummarizerResult<T> = Result<T, SummarizerError>;

/// Error type for summarizer client operations.
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// Configuration error (invalid base URL, poll settings, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// Local input failed validation and was never sent.
    #[error("Validation error: {}", violations.join("; "))]
    Validation {
        /// Every violated constraint, in the order they were checked.
        violations: Vec<String>,
    },

    /// The API answered with a non-2xx status.
    #[error("API error (HTTP {status_code}): {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Message extracted from the error body.
        message: String,
        /// Request ID for debugging.
        request_id: Option<String>,
    },

    /// Network/connection failure, including request timeouts.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Status polling exhausted its attempts without completion.
    #[error("Document {document_id} not ready after {attempts} status checks")]
    Timeout {
        /// The document that is still being processed.
        document_id: String,
        /// Number of status checks issued.
        attempts: u32,
    },

    /// The API reported that processing the document failed.
    #[error("Processing failed for document {document_id}: {message}")]
    DocumentFailed {
        /// The failed document.
        document_id: String,
        /// Reason reported by the API.
        message: String,
    },

    /// The submission cycle was cancelled by the caller.
    #[error("Submission cancelled")]
    Cancelled,
}

/// Coarse classification of a terminal workflow failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Bad local input.
    Validation,
    /// Non-2xx status, network failure or undecodable response.
    Transport,
    /// Polling ran out of attempts.
    Timeout,
    /// The API gave up on the document.
    Processing,
}

impl SummarizerError {
    /// Creates a validation error with a single violation.
    pub fn validation(message: impl Into<String>) -> Self {
        SummarizerError::Validation {
            violations: vec![message.into()],
        }
    }

    /// Creates a validation error from a list of violations.
    pub fn violations(violations: Vec<String>) -> Self {
        SummarizerError::Validation { violations }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        SummarizerError::Configuration {
            message: message.into(),
        }
    }

    /// Creates an API error.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        SummarizerError::Api {
            status_code,
            message: message.into(),
            request_id: None,
        }
    }

    /// Returns true for non-2xx statuses, network failures and undecodable bodies.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SummarizerError::Api { .. }
                | SummarizerError::Network { .. }
                | SummarizerError::Serialization { .. }
        )
    }

    /// Returns true if a failed status query should count as "not ready yet".
    ///
    /// Network trouble, undecodable bodies, 404 (document not visible yet),
    /// 408, 425, 429 and 5xx are transient. Any other 4xx means the query
    /// itself is wrong and retrying will not help.
    pub fn is_transient_poll_error(&self) -> bool {
        match self {
            SummarizerError::Network { .. } | SummarizerError::Serialization { .. } => true,
            SummarizerError::Api { status_code, .. } => {
                matches!(status_code, 404 | 408 | 425 | 429 | 500..=599)
            }
            _ => false,
        }
    }

    /// Returns the failure kind, or `None` for cancellation.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            SummarizerError::Validation { .. } | SummarizerError::Configuration { .. } => {
                Some(FailureKind::Validation)
            }
            SummarizerError::Api { .. }
            | SummarizerError::Network { .. }
            | SummarizerError::Serialization { .. } => Some(FailureKind::Transport),
            SummarizerError::Timeout { .. } => Some(FailureKind::Timeout),
            SummarizerError::DocumentFailed { .. } => Some(FailureKind::Processing),
            SummarizerError::Cancelled => None,
        }
    }

    /// Returns the document ID attached to the error, if any.
    pub fn document_id(&self) -> Option<&str> {
        match self {
            SummarizerError::Timeout { document_id, .. }
            | SummarizerError::DocumentFailed { document_id, .. } => Some(document_id),
            _ => None,
        }
    }

    /// Returns the violations of a validation error.
    pub fn violation_list(&self) -> &[String] {
        match self {
            SummarizerError::Validation { violations } => violations,
            _ => &[],
        }
    }

    /// Renders the error as a single message suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            SummarizerError::Configuration { .. } => {
                "The summarizer is not configured correctly.".to_string()
            }
            SummarizerError::Validation { violations } => {
                format!("Please fix the following: {}", violations.join("; "))
            }
            SummarizerError::Api {
                status_code,
                message,
                ..
            } => {
                let reason = http::StatusCode::from_u16(*status_code)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unexpected response");
                if message.is_empty() {
                    format!("The summarization service failed ({status_code} {reason}).")
                } else {
                    format!("The summarization service failed ({status_code} {reason}): {message}")
                }
            }
            SummarizerError::Network { .. } => {
                "Could not reach the summarization service. Check your connection and try again."
                    .to_string()
            }
            SummarizerError::Serialization { .. } => {
                "The summarization service sent a response that could not be read.".to_string()
            }
            SummarizerError::Timeout { document_id, .. } => format!(
                "Your document is still being processed. Check back later using document ID {document_id}."
            ),
            SummarizerError::DocumentFailed { message, .. } => {
                format!("The document could not be summarized: {message}")
            }
            SummarizerError::Cancelled => "The submission was cancelled.".to_string(),
        }
    }
}

/// Error body returned by the API.
///
/// The backend answers with `{"detail": "..."}`; proxies in front of it may
/// use `{"error": {"message": "..."}}` or `{"message": "..."}`.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum ApiErrorResponse {
    /// `{"detail": "..."}`
    Detail {
        /// The error detail.
        detail: String,
    },
    /// `{"error": {"message": "..."}}`
    Nested {
        /// The nested error object.
        error: ApiErrorDetail,
    },
    /// `{"message": "..."}`
    Flat {
        /// The error message.
        message: String,
    },
}

/// Nested API error information.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorDetail {
    /// The error message.
    pub message: String,
    /// The error code.
    pub code: Option<String>,
}

impl ApiErrorResponse {
    /// Returns the error message.
    pub fn message(&self) -> &str {
        match self {
            ApiErrorResponse::Detail { detail } => detail,
            ApiErrorResponse::Nested { error } => &error.message,
            ApiErrorResponse::Flat { message } => message,
        }
    }
}

impl From<reqwest::Error> for SummarizerError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            SummarizerError::api(status.as_u16(), err.to_string())
        } else {
            SummarizerError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for SummarizerError {
    fn from(err: serde_json::Error) -> Self {
        SummarizerError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for SummarizerError {
    fn from(err: url::ParseError) -> Self {
        SummarizerError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
