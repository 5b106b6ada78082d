use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::status::JobProgressStatus;
use crate::transition::allowed_successors;
use crate::validation::{validate, TransitionRequest, ValidationErrors, FIELD_STATUS};

/// Where the work on a job is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    #[default]
    InHouse,
    Outsourced,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::InHouse => write!(f, "in-house"),
            JobKind::Outsourced => write!(f, "outsourced"),
        }
    }
}

/// One accepted status change, kept in the job's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: Option<JobProgressStatus>,
    pub to: JobProgressStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_change: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// A print job and its progress status.
///
/// `status` only changes through [`Job::apply`], which validates the
/// request first and records every accepted change in `history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub kind: JobKind,
    pub status: Option<JobProgressStatus>,
    #[serde(default)]
    pub history: Vec<StatusChange>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(title: String, kind: JobKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            kind,
            status: Some(JobProgressStatus::Pending),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Statuses this job may move to next.
    pub fn allowed_next(&self) -> &'static [JobProgressStatus] {
        allowed_successors(self.status)
    }

    /// Validates `request` against the current status and, if it passes,
    /// moves the job to the requested status.
    ///
    /// On failure the job is left exactly as it was.
    pub fn apply(
        &mut self,
        request: &TransitionRequest,
    ) -> std::result::Result<StatusChange, ValidationErrors> {
        let current = self.status.map(|s| s.as_str());
        validate(request, current).into_result()?;

        // validate() has already rejected missing and unknown targets.
        let to = request
            .target()
            .and_then(|t| t.parse::<JobProgressStatus>().ok())
            .ok_or_else(|| {
                ValidationErrors::from([(FIELD_STATUS.to_string(), "Status is required".into())])
            })?;

        let change = StatusChange {
            from: self.status,
            to,
            notes: request.notes.clone().filter(|n| !n.is_empty()),
            reason_for_change: request.reason().map(str::to_string),
            changed_at: Utc::now(),
        };
        tracing::info!(job_id = %self.id, from = ?change.from, %to, "job status changed");

        self.status = Some(to);
        self.updated_at = change.changed_at;
        self.history.push(change.clone());
        Ok(change)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
