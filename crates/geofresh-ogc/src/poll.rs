//! Status polling: `GET {statusUrl}` until the job reaches a terminal state.

use reqwest::header::ACCEPT;
use reqwest::Url;
use tokio_util::sync::CancellationToken;

use crate::client::OgcClient;
use crate::error::{FailureReason, JobError};
use crate::observer::JobObserver;
use crate::outcome::ProgressUpdate;
use crate::retry::{is_retriable, PollAttemptError, RetryBudget};
use crate::types::{JobHandle, JobStatus, StatusInfo};

/// What the poll loop observed, kept even when it ends in an error.
#[derive(Debug, Default)]
pub(crate) struct PollLog {
    pub(crate) trail: Vec<ProgressUpdate>,
    pub(crate) polls: u32,
}

impl OgcClient {
    /// Polls the job's status URL until it succeeds, fails or is dismissed.
    ///
    /// Every status request is preceded by [`PollConfig::interval`], the first
    /// one included. Returns the final status document together with the
    /// non-terminal updates seen on the way.
    ///
    /// # Errors
    ///
    /// - [`JobError::JobFailed`] / [`JobError::JobDismissed`] for those
    ///   terminal states.
    /// - [`JobError::PollFailed`] when the retry budget is exhausted, on a
    ///   non-retriable HTTP status, or on an unreadable status document.
    /// - [`JobError::PollTimeout`] once [`PollConfig::max_wait`] has elapsed.
    /// - [`JobError::Cancelled`] if `cancel` fires.
    ///
    /// [`PollConfig::interval`]: crate::PollConfig::interval
    /// [`PollConfig::max_wait`]: crate::PollConfig::max_wait
    pub async fn poll(
        &self,
        handle: &JobHandle,
        observer: &dyn JobObserver,
        cancel: &CancellationToken,
    ) -> Result<(StatusInfo, Vec<ProgressUpdate>), JobError> {
        let mut log = PollLog::default();
        let info = self.poll_logged(handle, observer, cancel, &mut log).await?;
        Ok((info, log.trail))
    }

    pub(crate) async fn poll_logged(
        &self,
        handle: &JobHandle,
        observer: &dyn JobObserver,
        cancel: &CancellationToken,
        log: &mut PollLog,
    ) -> Result<StatusInfo, JobError> {
        let status_url = handle.resolved_status_url()?;
        let mut budget = RetryBudget::new(self.poll.max_retries);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(JobError::Cancelled),
                () = tokio::time::sleep(self.poll.interval) => {}
            }

            log.polls += 1;
            let attempt = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(JobError::Cancelled),
                attempt = self.fetch_status(&status_url) => attempt,
            };

            match attempt {
                Ok(info) => {
                    budget.reset();
                    tracing::debug!(
                        process = %handle.process,
                        poll = log.polls,
                        status = %info.status,
                        progress = ?info.progress,
                        "job status"
                    );
                    match info.status {
                        JobStatus::Successful => return Ok(info),
                        JobStatus::Failed => {
                            return Err(JobError::JobFailed {
                                description: info.failure_description(),
                            })
                        }
                        JobStatus::Dismissed => {
                            return Err(JobError::JobDismissed {
                                description: info.failure_description(),
                            })
                        }
                        JobStatus::Accepted | JobStatus::Running => {
                            let update = ProgressUpdate {
                                poll: log.polls,
                                elapsed: handle.elapsed(),
                                status: info.status,
                            };
                            observer.on_progress(&update);
                            log.trail.push(update);
                        }
                    }
                }
                Err(err) if is_retriable(&err) && budget.try_consume() => {
                    tracing::warn!(
                        process = %handle.process,
                        poll = log.polls,
                        retry = budget.used(),
                        max_retries = self.poll.max_retries,
                        error = %err,
                        "status poll failed, retrying"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        process = %handle.process,
                        poll = log.polls,
                        error = %err,
                        "status poll failed"
                    );
                    return Err(JobError::PollFailed(err.to_string()));
                }
            }

            let waited = handle.elapsed();
            if waited >= self.poll.max_wait {
                tracing::warn!(
                    process = %handle.process,
                    polls = log.polls,
                    waited_secs = waited.as_secs(),
                    "giving up on job"
                );
                return Err(JobError::PollTimeout {
                    waited_secs: waited.as_secs(),
                });
            }
        }
    }

    async fn fetch_status(&self, url: &Url) -> Result<StatusInfo, PollAttemptError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PollAttemptError::Status {
                status: status.as_u16(),
                reason: FailureReason::classify(status, &body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PollAttemptError::Malformed(e.to_string()))
    }
}
