//! Callbacks through which a running job reports back to its caller.

use crate::outcome::{Outcome, ProgressUpdate};
use crate::types::JobHandle;

/// Receives job events as they happen.
///
/// All methods default to doing nothing, so implementors only override what
/// they display. Called from the task driving the job; implementations should
/// not block.
pub trait JobObserver: Send + Sync {
    fn on_submitted(&self, _handle: &JobHandle) {}

    /// After every non-terminal status poll.
    fn on_progress(&self, _update: &ProgressUpdate) {}

    /// Exactly once per job, with the final outcome.
    fn on_outcome(&self, _outcome: &Outcome) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl JobObserver for NoopObserver {}
