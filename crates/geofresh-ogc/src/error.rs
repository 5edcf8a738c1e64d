use geofresh_core::CoreError;
use reqwest::StatusCode;
use thiserror::Error;

use crate::types::ErrorBody;

/// Errors from building an [`OgcClient`](crate::OgcClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying `reqwest::Client` could not be constructed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Why an HTTP exchange with the service failed.
///
/// Shared by submission and result fetching, which classify non-2xx responses
/// the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// Non-2xx response carrying pygeoapi's `{"description": ...}` error body.
    #[error("{description}")]
    Described { status: u16, description: String },

    /// HTTP 405, typically a failed CORS preflight or a proxy rejecting POST.
    #[error("HTTP request to service failed (HTTP 405), the request method was rejected")]
    MethodNotAllowed,

    /// No HTTP response at all.
    #[error("HTTP request to service failed or was blocked, probably a network problem: {0}")]
    Unreachable(String),

    /// Non-2xx response without a readable error body.
    #[error("{}", unspecified_message(.status))]
    Unspecified { status: u16 },

    /// 2xx response whose body is not JSON.
    #[error("service response is not valid JSON: {0}")]
    MalformedBody(String),
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn unspecified_message(status: &u16) -> String {
    if *status == 400 {
        "service reported a processing error (HTTP 400) without details".to_string()
    } else {
        format!("request failed for unspecified reason (HTTP {status}), possibly a timeout")
    }
}

impl FailureReason {
    /// Classifies a non-2xx response from its status and raw body.
    ///
    /// A structured `description` wins over the status code; without one,
    /// 405 is reported separately and everything else is unspecified.
    pub(crate) fn classify(status: StatusCode, body: &str) -> Self {
        let description = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.description)
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        match description {
            Some(description) => Self::Described {
                status: status.as_u16(),
                description,
            },
            None if status == StatusCode::METHOD_NOT_ALLOWED => Self::MethodNotAllowed,
            None => Self::Unspecified {
                status: status.as_u16(),
            },
        }
    }

    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        Self::Unreachable(err.to_string())
    }

    /// HTTP status of the failed response, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Described { status, .. } | Self::Unspecified { status } => Some(*status),
            Self::MethodNotAllowed => Some(405),
            Self::Unreachable(_) | Self::MalformedBody(_) => None,
        }
    }
}

/// Every way a job can end other than with a result.
///
/// Display strings are meant to be shown to the user as they are.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// Rejected locally before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to start job: {0}")]
    SubmissionFailed(FailureReason),

    #[error("service accepted the job but returned no Location header, so it cannot be tracked")]
    MissingPollLocation,

    #[error("polling job status failed: {0}")]
    PollFailed(String),

    #[error("gave up waiting for the job after {waited_secs}s")]
    PollTimeout { waited_secs: u64 },

    #[error("{description}")]
    JobFailed { description: String },

    #[error("{description}")]
    JobDismissed { description: String },

    #[error("job succeeded, but no JSON result link was found")]
    NoResultLink,

    #[error("job succeeded, but result fetch failed: {0}")]
    ResultFetchFailed(FailureReason),

    #[error("result is not GeoJSON (type: {})", .found.as_deref().unwrap_or("missing"))]
    ResultNotGeoJson { found: Option<String> },

    #[error("job was cancelled")]
    Cancelled,
}

impl From<CoreError> for JobError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidLocation(msg) | CoreError::InvalidProcessId(msg) => {
                Self::InvalidInput(msg)
            }
        }
    }
}
