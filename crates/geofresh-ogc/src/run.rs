//! The whole job pipeline behind one call that always yields a report.

use geofresh_core::{LocationSpec, ProcessId};
use tokio_util::sync::CancellationToken;

use crate::client::OgcClient;
use crate::error::JobError;
use crate::observer::JobObserver;
use crate::outcome::{JobReport, Outcome};
use crate::payload::JobRequest;
use crate::poll::PollLog;
use crate::types::JobResult;

impl OgcClient {
    /// Builds the payload for `process` and runs it.
    ///
    /// Invalid input is reported as [`Outcome::Failed`] without touching the
    /// network.
    pub async fn run(
        &self,
        process: ProcessId,
        spec: &LocationSpec,
        observer: &dyn JobObserver,
        cancel: &CancellationToken,
    ) -> JobReport {
        match JobRequest::new(process, spec) {
            Ok(request) => self.run_job(&request, observer, cancel).await,
            Err(err) => {
                tracing::warn!(error = %err, "rejected job input");
                finish(observer, JobReport::without_polls(Outcome::Failed(err)))
            }
        }
    }

    /// Submits `request`, polls it to completion and fetches its result.
    ///
    /// Never fails: every error ends up in [`JobReport::outcome`], and
    /// [`JobObserver::on_outcome`] is called exactly once.
    pub async fn run_job(
        &self,
        request: &JobRequest,
        observer: &dyn JobObserver,
        cancel: &CancellationToken,
    ) -> JobReport {
        let mut log = PollLog::default();
        let result = self.drive(request, observer, cancel, &mut log).await;
        let outcome = Outcome::from_result(result);

        match &outcome {
            Outcome::Success(geojson) => tracing::info!(
                process = %request.process(),
                polls = log.polls,
                kind = %geojson.kind(),
                features = geojson.feature_count(),
                "job finished"
            ),
            Outcome::Empty => tracing::info!(
                process = %request.process(),
                polls = log.polls,
                "job finished with an empty result"
            ),
            Outcome::Failed(err) => tracing::warn!(
                process = %request.process(),
                polls = log.polls,
                error = %err,
                "job failed"
            ),
        }

        finish(
            observer,
            JobReport {
                outcome,
                trail: log.trail,
                polls: log.polls,
            },
        )
    }

    async fn drive(
        &self,
        request: &JobRequest,
        observer: &dyn JobObserver,
        cancel: &CancellationToken,
        log: &mut PollLog,
    ) -> Result<JobResult, JobError> {
        if cancel.is_cancelled() {
            return Err(JobError::Cancelled);
        }

        let handle = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(JobError::Cancelled),
            handle = self.submit(request) => handle?,
        };
        observer.on_submitted(&handle);

        let info = self.poll_logged(&handle, observer, cancel, log).await?;
        let status_url = handle.resolved_status_url()?;
        self.fetch_result(&status_url, &info, cancel).await
    }
}

fn finish(observer: &dyn JobObserver, report: JobReport) -> JobReport {
    observer.on_outcome(&report.outcome);
    report
}
