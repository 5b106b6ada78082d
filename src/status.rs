use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The stage a print job is at in its lifecycle.
///
/// Every job starts as `Pending`. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobProgressStatus {
    Pending,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

impl JobProgressStatus {
    /// Every status, in canonical order.
    pub const ALL: [JobProgressStatus; 5] = [
        JobProgressStatus::Pending,
        JobProgressStatus::InProgress,
        JobProgressStatus::OnHold,
        JobProgressStatus::Completed,
        JobProgressStatus::Cancelled,
    ];

    /// Wire name, e.g. `in_progress`.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobProgressStatus::Pending => "pending",
            JobProgressStatus::InProgress => "in_progress",
            JobProgressStatus::OnHold => "on_hold",
            JobProgressStatus::Completed => "completed",
            JobProgressStatus::Cancelled => "cancelled",
        }
    }

    /// True when no further transition is allowed out of this status.
    pub fn is_terminal(&self) -> bool {
        crate::transition::allowed_successors(Some(*self)).is_empty()
    }
}

impl fmt::Display for JobProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for JobProgressStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
