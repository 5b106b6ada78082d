use thiserror::Error;

use crate::api::ApiError;
use crate::validation::ValidationErrors;

pub type Result<T> = std::result::Result<T, PrintshopError>;

#[derive(Debug, Error)]
pub enum PrintshopError {
    #[error("Job API error: {0}")]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Joins field errors as `field: message; field: message`.
pub fn format_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_errors_lists_fields_in_order() {
        let errors = ValidationErrors::from([
            ("progress_status".to_string(), "Status is required".to_string()),
            ("notes".to_string(), "Notes cannot exceed 1000 characters".to_string()),
        ]);
        assert_eq!(
            format_errors(&errors),
            "notes: Notes cannot exceed 1000 characters; progress_status: Status is required"
        );
    }

    #[test]
    fn api_error_display_is_wrapped() {
        let err = PrintshopError::from(ApiError::NotFound("42".into()));
        assert_eq!(err.to_string(), "Job API error: job not found: 42");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PrintshopError>();
    }
}
