//! Starting a job: `POST /processes/{id}/execution` with `Prefer: respond-async`.

use std::time::Instant;

use chrono::Utc;
use reqwest::header::{ACCEPT, LOCATION};

use crate::client::OgcClient;
use crate::error::{FailureReason, JobError};
use crate::payload::JobRequest;
use crate::types::JobHandle;

impl OgcClient {
    /// Submits `request` for asynchronous execution.
    ///
    /// Submission failures are never retried; a 400 from pygeoapi means the
    /// process itself rejected the inputs.
    ///
    /// # Errors
    ///
    /// - [`JobError::SubmissionFailed`] on a transport failure or non-2xx
    ///   status, classified by [`FailureReason`].
    /// - [`JobError::MissingPollLocation`] if a 2xx response has no usable
    ///   `Location` header.
    pub async fn submit(&self, request: &JobRequest) -> Result<JobHandle, JobError> {
        let url = self.execution_url(request.process());
        tracing::debug!(process = %request.process(), url = %url, "submitting job");

        let response = self
            .client
            .post(url.clone())
            .header("Prefer", "respond-async")
            .header(ACCEPT, "application/json")
            .json(&request.body())
            .send()
            .await
            .map_err(|e| JobError::SubmissionFailed(FailureReason::from_transport(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = FailureReason::classify(status, &body);
            tracing::warn!(
                process = %request.process(),
                status = status.as_u16(),
                reason = %reason,
                "job submission rejected"
            );
            return Err(JobError::SubmissionFailed(reason));
        }

        let status_url = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .ok_or(JobError::MissingPollLocation)?;

        tracing::info!(
            process = %request.process(),
            status = status.as_u16(),
            status_url = %status_url,
            "job accepted"
        );

        Ok(JobHandle {
            status_url,
            process: request.process().clone(),
            submitted_at: Utc::now(),
            execution_url: url,
            started_at: Instant::now(),
        })
    }
}
