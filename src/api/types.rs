//! Request and response bodies for the job-management API.

use serde::{Deserialize, Serialize};

use crate::validation::{TransitionRequest, ValidationErrors};

/// The part of a job resource this crate cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub progress_status: Option<String>,
}

/// Body of `PATCH /jobs/{id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate<'a> {
    pub progress_status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_for_change: Option<&'a str>,
}

impl<'a> StatusUpdate<'a> {
    /// Builds the wire body from an already validated request.
    pub fn from_request(request: &'a TransitionRequest) -> Option<Self> {
        Some(Self {
            progress_status: request.target()?,
            notes: request.notes.as_deref().filter(|n| !n.is_empty()),
            reason_for_change: request.reason(),
        })
    }
}

/// Error body returned with 400/422.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub errors: ValidationErrors,
    #[serde(default)]
    pub message: Option<String>,
}

// Backends disagree on numeric vs string ids.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(u64),
        Str(String),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Num(n) => n.to_string(),
        Id::Str(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_accepts_numeric_and_string_ids() {
        let a: JobSummary =
            serde_json::from_str(r#"{"id": 42, "progress_status": "on_hold", "title": "Flyers"}"#)
                .unwrap();
        assert_eq!(a.id, "42");
        assert_eq!(a.progress_status.as_deref(), Some("on_hold"));

        let b: JobSummary = serde_json::from_str(r#"{"id": "J-7"}"#).unwrap();
        assert_eq!(b.id, "J-7");
        assert!(b.progress_status.is_none());
    }

    #[test]
    fn update_body_omits_empty_fields() {
        let req = TransitionRequest {
            target_status: Some("on_hold".into()),
            notes: Some(String::new()),
            reason_for_change: None,
        };
        let body = StatusUpdate::from_request(&req).unwrap();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"progress_status": "on_hold"})
        );
    }

    #[test]
    fn update_body_needs_target() {
        assert!(StatusUpdate::from_request(&TransitionRequest::default()).is_none());
    }

    #[test]
    fn error_body_tolerates_missing_fields() {
        let body: ErrorBody = serde_json::from_str(r#"{"message": "bad"}"#).unwrap();
        assert!(body.errors.is_empty());
        assert_eq!(body.message.as_deref(), Some("bad"));
    }
}
