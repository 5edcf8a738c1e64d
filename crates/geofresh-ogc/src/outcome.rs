//! The single value a job produces for its caller.

use std::time::Duration;

use crate::error::JobError;
use crate::types::{GeoJson, JobResult, JobStatus};

/// One non-terminal status observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// 1-based number of the status request that produced this update.
    pub poll: u32,
    /// Time since the job was accepted.
    pub elapsed: Duration,
    pub status: JobStatus,
}

impl ProgressUpdate {
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.as_secs()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(GeoJson),
    /// The job succeeded but its result was `null`. Not an error: some
    /// processes legitimately find nothing, e.g. upstream of a headwater.
    Empty,
    Failed(JobError),
}

impl Outcome {
    #[must_use]
    pub fn from_result(result: Result<JobResult, JobError>) -> Self {
        match result {
            Ok(JobResult::GeoJson(geojson)) => Self::Success(geojson),
            Ok(JobResult::Empty) => Self::Empty,
            Err(err) => Self::Failed(err),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    #[must_use]
    pub fn error(&self) -> Option<&JobError> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Success(_) | Self::Empty => None,
        }
    }

    /// Text suitable for showing to the user as is.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Success(geojson) => format!(
                "received a {} with {} feature(s)",
                geojson.kind(),
                geojson.feature_count()
            ),
            Self::Empty => "the service returned no features; for upstream queries the location \
                            may be a headwater, for downstream ones it may already be at the coast"
                .to_string(),
            Self::Failed(err) => err.to_string(),
        }
    }
}

/// Everything a finished job hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub outcome: Outcome,
    /// Non-terminal status observations in the order they were made.
    pub trail: Vec<ProgressUpdate>,
    /// Status requests issued, including failed and terminal ones.
    pub polls: u32,
}

impl JobReport {
    pub(crate) fn without_polls(outcome: Outcome) -> Self {
        Self {
            outcome,
            trail: Vec::new(),
            polls: 0,
        }
    }

    /// Elapsed time at the last progress update, if there was one.
    #[must_use]
    pub fn last_elapsed(&self) -> Option<Duration> {
        self.trail.last().map(|u| u.elapsed)
    }
}
