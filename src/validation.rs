//! Validation of job progress-status change requests.
//!
//! [`validate`] is pure: it never touches a job or the network. Every rule
//! is checked and every failure is collected into a field-keyed map, so a
//! form can show all problems at once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::status::JobProgressStatus;
use crate::transition::allowed_successors;

pub const MAX_NOTES_CHARS: usize = 1000;
pub const MAX_REASON_CHARS: usize = 500;

pub const FIELD_STATUS: &str = "progress_status";
pub const FIELD_NOTES: &str = "notes";
pub const FIELD_REASON: &str = "reason_for_change";

/// A proposed status change, as submitted by a user.
///
/// Statuses stay as raw strings here; an unknown value is a validation
/// failure, not a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    #[serde(rename = "progress_status", alias = "targetStatus")]
    pub target_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        alias = "reasonForChange",
        skip_serializing_if = "Option::is_none"
    )]
    pub reason_for_change: Option<String>,
}

impl TransitionRequest {
    pub fn to(status: JobProgressStatus) -> Self {
        Self {
            target_status: Some(status.to_string()),
            ..Default::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason_for_change = Some(reason.into());
        self
    }

    /// Target status, treating an empty string as missing.
    pub fn target(&self) -> Option<&str> {
        non_empty(self.target_status.as_deref())
    }

    pub fn reason(&self) -> Option<&str> {
        non_empty(self.reason_for_change.as_deref())
    }
}

/// Field name → human-readable message.
pub type ValidationErrors = BTreeMap<String, String>;

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: ValidationErrors,
}

impl ValidationResult {
    fn from_errors(errors: ValidationErrors) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// `Ok(())` when valid, the error map otherwise.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Validates `request` against the job's `current_status`.
///
/// Rules, all evaluated:
/// 1. a target status is given;
/// 2. if a current status is given, the target is one of its successors
///    (`Cannot transition from {current} to {target}`, also for unknown
///    strings on either side); with no current status the table allows any
///    target, but it must still name a known status (`Unknown status {target}`);
/// 3. notes fit in [`MAX_NOTES_CHARS`];
/// 4. cancelling requires a reason that fits in [`MAX_REASON_CHARS`].
pub fn validate(request: &TransitionRequest, current_status: Option<&str>) -> ValidationResult {
    let mut errors = ValidationErrors::new();
    let target = request.target();
    let current = non_empty(current_status);

    match (target, current) {
        (None, _) => {
            errors.insert(FIELD_STATUS.into(), "Status is required".into());
        }
        (Some(target), Some(current)) => {
            if !is_allowed(current, target) {
                errors.insert(
                    FIELD_STATUS.into(),
                    format!("Cannot transition from {current} to {target}"),
                );
            }
        }
        (Some(target), None) => {
            if target.parse::<JobProgressStatus>().is_err() {
                errors.insert(FIELD_STATUS.into(), format!("Unknown status {target}"));
            }
        }
    }

    let notes_len = request.notes.as_deref().map_or(0, |n| n.chars().count());
    if notes_len > MAX_NOTES_CHARS {
        errors.insert(
            FIELD_NOTES.into(),
            format!("Notes cannot exceed {MAX_NOTES_CHARS} characters"),
        );
    }

    if target == Some(JobProgressStatus::Cancelled.as_str()) {
        match request.reason() {
            None => {
                errors.insert(
                    FIELD_REASON.into(),
                    "Reason is required when cancelling a job".into(),
                );
            }
            Some(reason) if reason.chars().count() > MAX_REASON_CHARS => {
                errors.insert(
                    FIELD_REASON.into(),
                    format!("Reason cannot exceed {MAX_REASON_CHARS} characters"),
                );
            }
            Some(_) => {}
        }
    }

    if !errors.is_empty() {
        tracing::debug!(?current, ?target, ?errors, "transition request rejected");
    }

    ValidationResult::from_errors(errors)
}

// Unknown strings on either side are simply not in the table.
fn is_allowed(current: &str, target: &str) -> bool {
    let (Ok(current), Ok(target)) = (
        current.parse::<JobProgressStatus>(),
        target.parse::<JobProgressStatus>(),
    ) else {
        return false;
    };
    allowed_successors(Some(current)).contains(&target)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(target: &str) -> TransitionRequest {
        TransitionRequest {
            target_status: Some(target.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn pending_to_in_progress_is_valid() {
        let result = validate(&request("in_progress"), Some("pending"));
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn pending_to_completed_is_rejected() {
        let result = validate(&request("completed"), Some("pending"));
        assert!(!result.is_valid);
        assert_eq!(
            result.errors[FIELD_STATUS],
            "Cannot transition from pending to completed"
        );
    }

    #[test]
    fn missing_target_is_always_invalid() {
        let cases = [
            TransitionRequest::default(),
            TransitionRequest {
                target_status: Some(String::new()),
                notes: Some("rush order".into()),
                reason_for_change: Some("client asked".into()),
            },
        ];
        for current in [None, Some("pending"), Some("cancelled")] {
            for req in &cases {
                let result = validate(req, current);
                assert!(!result.is_valid);
                assert_eq!(result.errors[FIELD_STATUS], "Status is required");
            }
        }
    }

    #[test]
    fn cancelling_requires_reason() {
        let req = request("cancelled");
        let result = validate(&req, Some("in_progress"));
        assert!(!result.is_valid);
        assert_eq!(
            result.errors[FIELD_REASON],
            "Reason is required when cancelling a job"
        );
        assert!(!result.errors.contains_key(FIELD_STATUS));

        let result = validate(&req.with_reason("client withdrew"), Some("in_progress"));
        assert!(result.is_valid);
    }

    #[test]
    fn empty_reason_counts_as_missing() {
        let req = request("cancelled").with_reason("");
        let result = validate(&req, Some("pending"));
        assert_eq!(
            result.errors[FIELD_REASON],
            "Reason is required when cancelling a job"
        );
    }

    #[test]
    fn reason_length_is_capped() {
        let at_limit = request("cancelled").with_reason("r".repeat(MAX_REASON_CHARS));
        assert!(validate(&at_limit, Some("on_hold")).is_valid);

        let over = request("cancelled").with_reason("r".repeat(MAX_REASON_CHARS + 1));
        let result = validate(&over, Some("on_hold"));
        assert_eq!(
            result.errors[FIELD_REASON],
            "Reason cannot exceed 500 characters"
        );
    }

    #[test]
    fn reason_is_ignored_unless_cancelling() {
        let req = request("on_hold").with_reason("x".repeat(MAX_REASON_CHARS * 2));
        assert!(validate(&req, Some("in_progress")).is_valid);
    }

    #[test]
    fn long_notes_fail_independently_of_transition() {
        let notes = "x".repeat(MAX_NOTES_CHARS + 1);

        let result = validate(&request("in_progress").with_notes(&notes), Some("pending"));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[FIELD_NOTES],
            "Notes cannot exceed 1000 characters"
        );

        let result = validate(&request("completed").with_notes(&notes), Some("pending"));
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors.contains_key(FIELD_STATUS));
        assert!(result.errors.contains_key(FIELD_NOTES));
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        // 1000 two-byte characters is still within the limit.
        let notes = "é".repeat(MAX_NOTES_CHARS);
        let result = validate(&request("in_progress").with_notes(notes), Some("pending"));
        assert!(result.is_valid);
    }

    #[test]
    fn all_errors_are_collected() {
        let req = request("cancelled").with_notes("n".repeat(MAX_NOTES_CHARS + 1));
        let result = validate(&req, Some("cancelled"));
        assert_eq!(result.errors.len(), 3);
        assert_eq!(
            result.errors[FIELD_STATUS],
            "Cannot transition from cancelled to cancelled"
        );
        assert!(result.errors.contains_key(FIELD_NOTES));
        assert!(result.errors.contains_key(FIELD_REASON));
    }

    #[test]
    fn unknown_statuses_are_validation_failures() {
        let result = validate(&request("archived"), Some("pending"));
        assert_eq!(
            result.errors[FIELD_STATUS],
            "Cannot transition from pending to archived"
        );

        let result = validate(&request("in_progress"), Some("queued"));
        assert_eq!(
            result.errors[FIELD_STATUS],
            "Cannot transition from queued to in_progress"
        );

        let result = validate(&request("archived"), None);
        assert_eq!(result.errors[FIELD_STATUS], "Unknown status archived");
    }

    #[test]
    fn missing_current_status_allows_any_known_target() {
        for status in JobProgressStatus::ALL {
            let mut req = TransitionRequest::to(status);
            if status == JobProgressStatus::Cancelled {
                req = req.with_reason("duplicate order");
            }
            assert!(validate(&req, None).is_valid, "{status} rejected");
            assert!(validate(&req, Some("")).is_valid, "{status} rejected");
        }
    }

    #[test]
    fn validation_is_repeatable() {
        let req = request("cancelled").with_notes("n".repeat(1200));
        let first = validate(&req, Some("completed"));
        let second = validate(&req, Some("completed"));
        assert_eq!(first, second);
    }

    #[test]
    fn request_accepts_camel_case_aliases() {
        let req: TransitionRequest = serde_json::from_str(
            r#"{"targetStatus":"cancelled","reasonForChange":"client withdrew"}"#,
        )
        .unwrap();
        assert_eq!(req.target(), Some("cancelled"));
        assert_eq!(req.reason(), Some("client withdrew"));
        assert!(req.notes.is_none());
    }

    #[test]
    fn result_serializes_for_forms() {
        let result = validate(&request("completed"), Some("pending"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(
            json["errors"]["progress_status"],
            "Cannot transition from pending to completed"
        );
    }

    #[test]
    fn into_result_splits_outcomes() {
        assert!(validate(&request("in_progress"), Some("on_hold"))
            .into_result()
            .is_ok());
        let errors = validate(&request("pending"), Some("on_hold"))
            .into_result()
            .unwrap_err();
        assert!(errors.contains_key(FIELD_STATUS));
    }
}
