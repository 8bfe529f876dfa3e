//! Error types for trigger lifecycle operations.

use std::time::Duration;

use flowhook_types::HookStatus;
use thiserror::Error;

/// Result type for trigger lifecycle operations.
pub type Result<T> = std::result::Result<T, DisableError>;

/// Failure to get an answer from a worker for a hook job.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    /// No reply arrived within the dispatch timeout.
    #[error("worker did not respond within {0:?}")]
    Timeout(Duration),

    /// The worker queue is closed or the worker dropped the request.
    #[error("worker channel closed")]
    ChannelClosed,

    /// The worker could not run the job.
    #[error("worker error: {0}")]
    Worker(String),

    /// The hook ran but reported a non-OK status.
    #[error("hook finished with status {status}: {message}")]
    HookFailed { status: HookStatus, message: String },

    /// The reply could not be decoded as a hook response.
    #[error("malformed worker response: {0}")]
    MalformedResponse(String),
}

/// Failure of a recurring job store or event listener registry.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The recurring job store rejected or could not serve the request.
    #[error("job store error: {0}")]
    JobStore(String),

    /// The event listener registry rejected or could not serve the request.
    #[error("listener registry error: {0}")]
    ListenerRegistry(String),
}

/// Errors surfaced by [`TriggerDeactivator::disable`](crate::TriggerDeactivator::disable).
#[derive(Debug, Error)]
pub enum DisableError {
    /// The on-disable hook failed and the caller asked for errors to surface.
    /// Cleanup has already run successfully.
    #[error("on-disable hook failed")]
    HookExecution(#[source] DispatchError),

    /// Removing the trigger's recurring job or listeners failed.
    ///
    /// `hook_failure` carries the hook error that would have been returned
    /// had cleanup succeeded.
    #[error("trigger cleanup failed")]
    Cleanup {
        #[source]
        source: StoreError,
        hook_failure: Option<Box<DispatchError>>,
    },
}

impl DisableError {
    /// The hook dispatch error, if the hook call failed and was not ignored.
    pub fn hook_error(&self) -> Option<&DispatchError> {
        match self {
            DisableError::HookExecution(err) => Some(err),
            DisableError::Cleanup { hook_failure, .. } => hook_failure.as_deref(),
        }
    }

    /// Whether cleanup failed, possibly leaving jobs or listeners behind.
    pub fn is_cleanup_failure(&self) -> bool {
        matches!(self, DisableError::Cleanup { .. })
    }
}
