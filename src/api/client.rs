use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use tokio::time::sleep;
use uuid::Uuid;

use super::error::ApiError;
use super::types::{ErrorBody, JobSummary, StatusUpdate};
use super::StatusApi;
use crate::config::ApiConfig;
use crate::validation::{validate, TransitionRequest, ValidationErrors, FIELD_STATUS};

/// Backoff settings for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    /// Upper bound for any single wait, including server `retry-after`.
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// delay = base_delay_ms * 2^(attempt - 1), capped at `max_delay_ms`
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        self.base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
            .min(self.max_delay_ms)
    }

    /// Converts a `retry-after` value in seconds to a capped delay.
    pub fn retry_after_delay(&self, secs: u64) -> u64 {
        secs.saturating_mul(1000).min(self.max_delay_ms)
    }
}

impl From<&ApiConfig> for RetryPolicy {
    fn from(config: &ApiConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }
}

/// HTTP client for the external job-management API.
pub struct JobsClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    retry: RetryPolicy,
}

impl JobsClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }
        Ok(Self {
            client,
            base_url,
            token: Some(config.token.clone()).filter(|t| !t.is_empty()),
            retry: RetryPolicy::from(config),
        })
    }

    /// `{base}/jobs/{job_id}/{tail..}`, with each segment percent-encoded.
    fn job_url(&self, job_id: &str, tail: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("jobs")
            .push(job_id)
            .extend(tail);
        Ok(url)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request built by `build`, retrying network errors, 429 and
    /// 5xx responses. Any other response is handed back to the caller.
    async fn execute<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let result = match build().send().await {
                Ok(response) => self.check_transient(response).await,
                Err(err) => Err(ApiError::Network(err)),
            };

            match result {
                Err(err) if err.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay_ms = match &err {
                        ApiError::RateLimited { retry_after_ms } => *retry_after_ms,
                        _ => self.retry.delay_for_attempt(attempt),
                    };
                    tracing::warn!(
                        attempt,
                        max = self.retry.max_retries,
                        delay_ms,
                        error = %err,
                        "retrying job API request"
                    );
                    sleep(Duration::from_millis(delay_ms)).await;
                }
                other => return other,
            }
        }
    }

    async fn check_transient(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_ms = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| self.retry.retry_after_delay(secs))
                .unwrap_or_else(|| self.retry.delay_for_attempt(1));
            return Err(ApiError::RateLimited { retry_after_ms });
        }

        if status.is_server_error() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

// Turns a non-transient response into a job summary or a typed error.
async fn read_summary(
    response: Response,
    job_id: &str,
    fallback: Option<&str>,
) -> Result<JobSummary, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        if text.trim().is_empty() {
            return Ok(JobSummary {
                id: job_id.to_string(),
                progress_status: fallback.map(str::to_string),
            });
        }
        return serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()));
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(job_id.to_string()));
    }

    if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        if !body.errors.is_empty() {
            return Err(ApiError::Rejected(body.errors));
        }
        if let Some(message) = body.message {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
    }

    Err(ApiError::Status {
        status: status.as_u16(),
        message: text,
    })
}

impl StatusApi for JobsClient {
    async fn fetch_job(&self, job_id: &str) -> Result<JobSummary, ApiError> {
        let url = self.job_url(job_id, &[])?;
        tracing::debug!(%url, "fetching job");
        let response = self
            .execute(|| self.request(self.client.get(url.clone())))
            .await?;
        read_summary(response, job_id, None).await
    }

    async fn update_status(
        &self,
        job_id: &str,
        current_status: Option<&str>,
        request: &TransitionRequest,
    ) -> Result<JobSummary, ApiError> {
        validate(request, current_status)
            .into_result()
            .map_err(ApiError::Invalid)?;
        let body = StatusUpdate::from_request(request).ok_or_else(|| {
            ApiError::Invalid(ValidationErrors::from([(
                FIELD_STATUS.to_string(),
                "Status is required".to_string(),
            )]))
        })?;

        let url = self.job_url(job_id, &["status"])?;
        let request_id = Uuid::new_v4().to_string();
        tracing::info!(%url, %request_id, to = body.progress_status, "submitting status change");

        let response = self
            .execute(|| {
                self.request(self.client.patch(url.clone()))
                    .header("x-request-id", &request_id)
                    .json(&body)
            })
            .await?;
        read_summary(response, job_id, Some(body.progress_status)).await
    }
}
