//! Client side of the external job-management API.
//!
//! Status changes are always validated locally before they are sent; the
//! server stays the authority on whether a change is finally accepted.

pub mod client;
pub mod error;
pub mod types;

pub use client::{JobsClient, RetryPolicy};
pub use error::ApiError;
pub use types::JobSummary;

use crate::validation::TransitionRequest;

/// The operations the CLI needs from the job API.
#[allow(async_fn_in_trait)]
pub trait StatusApi {
    async fn fetch_job(&self, job_id: &str) -> Result<JobSummary, ApiError>;

    /// Validates `request` against `current_status`, then submits it.
    async fn update_status(
        &self,
        job_id: &str,
        current_status: Option<&str>,
        request: &TransitionRequest,
    ) -> Result<JobSummary, ApiError>;
}

/// Submits a status change for `job_id`.
///
/// When `current_status` is not known the job is fetched first, so the
/// change is validated against what the server currently holds.
pub async fn submit_transition(
    api: &impl StatusApi,
    job_id: &str,
    current_status: Option<String>,
    request: &TransitionRequest,
) -> Result<JobSummary, ApiError> {
    let current = match current_status {
        Some(status) => Some(status),
        None => api.fetch_job(job_id).await?.progress_status,
    };
    api.update_status(job_id, current.as_deref(), request).await
}
