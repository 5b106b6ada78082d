//! Errors returned by the job-management API client.

use thiserror::Error;

use crate::error::format_errors;
use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request failed local validation and was never sent.
    #[error("invalid request: {}", format_errors(.0))]
    Invalid(ValidationErrors),

    /// The server refused the change with field-level messages (HTTP 400/422).
    #[error("rejected by server: {}", format_errors(.0))]
    Rejected(ValidationErrors),

    /// HTTP 429. `retry_after_ms` comes from the `retry-after` header.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("job not found: {0}")]
    NotFound(String),

    /// Any other non-success status, after retries where applicable.
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// The configured base URL cannot have job paths appended.
    #[error("invalid API base URL: {0}")]
    InvalidUrl(String),

    #[error("failed to parse API response: {0}")]
    Decode(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// Whether a retry may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::RateLimited { .. } => true,
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Field errors, for either local or server-side rejection.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ApiError::Invalid(errors) | ApiError::Rejected(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = ApiError::Status {
            status: 503,
            message: "maintenance".into(),
        };
        assert_eq!(err.to_string(), "API error (status 503): maintenance");
    }

    #[test]
    fn transient_classification() {
        let status = |status| ApiError::Status {
            status,
            message: String::new(),
        };
        assert!(status(500).is_transient());
        assert!(status(502).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(409).is_transient());
        assert!(ApiError::RateLimited { retry_after_ms: 0 }.is_transient());
        assert!(!ApiError::Decode("eof".into()).is_transient());
        assert!(!ApiError::NotFound("42".into()).is_transient());
        assert!(!ApiError::Invalid(ValidationErrors::new()).is_transient());
    }

    #[test]
    fn field_errors_exposed_for_rejections() {
        let errors = ValidationErrors::from([(
            "reason_for_change".to_string(),
            "Reason is required when cancelling a job".to_string(),
        )]);
        let err = ApiError::Rejected(errors.clone());
        assert_eq!(err.field_errors(), Some(&errors));
        assert_eq!(
            err.to_string(),
            "rejected by server: reason_for_change: Reason is required when cancelling a job"
        );
        assert!(ApiError::NotFound("7".into()).field_errors().is_none());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiError>();
    }
}
