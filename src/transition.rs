//! Static transition table for job progress statuses.
//!
//! The table is plain data: each status maps to the ordered list of
//! statuses a job may move to next. It is never mutated.

use crate::status::JobProgressStatus::{self, Cancelled, Completed, InProgress, OnHold, Pending};

/// Status → allowed successors, in canonical status order.
pub static TRANSITIONS: [(JobProgressStatus, &[JobProgressStatus]); 5] = [
    (Pending, &[InProgress, Cancelled]),
    (InProgress, &[OnHold, Completed, Cancelled]),
    (OnHold, &[InProgress, Cancelled]),
    (Completed, &[InProgress]),
    (Cancelled, &[]),
];

/// Returns the statuses a job in `status` may move to.
///
/// A job with no status at all may move to any status.
pub fn allowed_successors(status: Option<JobProgressStatus>) -> &'static [JobProgressStatus] {
    let Some(status) = status else {
        return &JobProgressStatus::ALL;
    };
    TRANSITIONS
        .iter()
        .find(|(from, _)| *from == status)
        .map(|(_, to)| *to)
        .unwrap_or(&[])
}

/// Whether moving from `from` to `to` is a legal transition.
pub fn can_transition(from: Option<JobProgressStatus>, to: JobProgressStatus) -> bool {
    allowed_successors(from).contains(&to)
}
