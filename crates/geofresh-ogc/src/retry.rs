//! Retry policy for status polling.
//!
//! A poll that fails transiently is simply repeated on the next tick of the
//! poll loop; there is no extra back-off, the regular interval already spaces
//! attempts out. [`RetryBudget`] bounds how many *consecutive* transient
//! failures are tolerated so a persistent network partition cannot keep the
//! loop alive forever.

use thiserror::Error;

use crate::error::FailureReason;

/// Why a single status request failed.
#[derive(Debug, Error)]
pub(crate) enum PollAttemptError {
    /// No HTTP response, or the body could not be read.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("status endpoint returned HTTP {status}: {reason}")]
    Status { status: u16, reason: FailureReason },

    /// 2xx response that is not a status document we understand.
    #[error("unreadable status document: {0}")]
    Malformed(String),
}

/// Returns `true` for failures worth another poll.
///
/// **Retriable:**
/// - Transport failures: connection refused/reset, timeouts, truncated bodies.
/// - HTTP 5xx and 429: overloaded or restarting service.
///
/// **Not retriable:**
/// - Other 4xx: the job is unknown or the URL is wrong; asking again won't help.
/// - Malformed documents: the service speaks a different protocol.
pub(crate) fn is_retriable(err: &PollAttemptError) -> bool {
    match err {
        PollAttemptError::Transport(e) => !e.is_builder(),
        PollAttemptError::Status { status, .. } => *status >= 500 || *status == 429,
        PollAttemptError::Malformed(_) => false,
    }
}

/// Counts consecutive transient failures against `max_retries`.
#[derive(Debug)]
pub(crate) struct RetryBudget {
    max_retries: u32,
    used: u32,
}

impl RetryBudget {
    pub(crate) fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            used: 0,
        }
    }

    /// Spends one retry. Returns `false` once the budget is exhausted.
    pub(crate) fn try_consume(&mut self) -> bool {
        if self.used >= self.max_retries {
            return false;
        }
        self.used += 1;
        true
    }

    /// Called after every successful poll.
    pub(crate) fn reset(&mut self) {
        self.used = 0;
    }

    pub(crate) fn used(&self) -> u32 {
        self.used
    }
}
