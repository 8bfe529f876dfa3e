//! Failure sinks.

use tracing::error;

use crate::error::DispatchError;
use crate::traits::FailureSink;

/// Reports failures as `error` level tracing events.
///
/// Pair with a subscriber layer that forwards errors to the tracker of
/// choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFailureSink;

impl FailureSink for TracingFailureSink {
    fn record(&self, err: &DispatchError) {
        error!(error = %err, kind = ?err, "Trigger hook dispatch failed");
    }
}
