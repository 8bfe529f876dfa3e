//! Trigger deactivation.
//!
//! [`TriggerDeactivator::disable`] asks a worker to run the piece's on-disable
//! hook, then removes the recurring job or app event listeners the trigger's
//! strategy implies. Cleanup runs once the hook call settles, whatever its
//! outcome, so a failing or slow piece never leaves schedules behind.

use std::sync::Arc;

use flowhook_types::{FlowVersion, HookJob, HookResponse, PieceTriggerDefinition, ProjectId};
use tracing::{debug, error, info, warn};

use crate::cleanup::{CleanupAction, TriggerCleanup};
use crate::error::{DisableError, Result, StoreError};
use crate::sink::TracingFailureSink;
use crate::traits::{
    SharedDispatcher, SharedFailureSink, SharedJobStore, SharedListenerRegistry, SharedResolver,
    SharedWebhookUrls,
};
use crate::webhook::WebhookUrlBuilder;

/// Input to [`TriggerDeactivator::disable`].
#[derive(Debug, Clone)]
pub struct DisableRequest {
    pub flow_version: FlowVersion,
    pub project_id: ProjectId,
    /// Test invocation: the hook receives the test webhook URL.
    pub simulate: bool,
    /// Swallow hook failures instead of returning them.
    pub ignore_error: bool,
}

impl DisableRequest {
    pub fn new(flow_version: FlowVersion, project_id: impl Into<ProjectId>) -> Self {
        Self {
            flow_version,
            project_id: project_id.into(),
            simulate: false,
            ignore_error: false,
        }
    }

    pub fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    pub fn ignore_error(mut self, ignore_error: bool) -> Self {
        self.ignore_error = ignore_error;
        self
    }
}

/// Cleanup for one resolved trigger, owned so it can outlive the caller.
#[derive(Clone)]
struct PendingCleanup {
    cleanup: TriggerCleanup,
    definition: PieceTriggerDefinition,
    project_id: ProjectId,
    flow_version: FlowVersion,
}

impl PendingCleanup {
    async fn run(&self) -> std::result::Result<CleanupAction, StoreError> {
        self.cleanup
            .run(&self.definition, &self.project_id, &self.flow_version)
            .await
    }
}

/// Runs the pending cleanup in the background if dropped while armed.
///
/// Armed from just before the hook dispatch until cleanup settles: if the
/// `disable` future is dropped in between, the trigger's jobs and listeners
/// are still removed. Cleanup is idempotent, so a repeat is harmless.
struct CleanupGuard {
    pending: Option<PendingCleanup>,
}

impl CleanupGuard {
    fn arm(pending: PendingCleanup) -> Self {
        Self {
            pending: Some(pending),
        }
    }

    fn disarm(mut self) {
        self.pending = None;
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let flow_version_id = pending.flow_version.id.clone();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!(%flow_version_id, "Trigger disable cancelled before cleanup finished, cleaning up in background");
                handle.spawn(async move {
                    if let Err(e) = pending.run().await {
                        error!(flow_version_id = %pending.flow_version.id, error = %e, "Background trigger cleanup failed");
                    }
                });
            }
            Err(_) => {
                warn!(%flow_version_id, "Trigger disable cancelled outside a runtime, cleanup skipped");
            }
        }
    }
}

/// Disables piece triggers: runs the on-disable hook on a worker and removes
/// the trigger's recurring job or app event listeners.
///
/// Holds no per-call state, so one instance can serve concurrent
/// deactivations of different flow versions.
#[derive(Clone)]
pub struct TriggerDeactivator {
    resolver: SharedResolver,
    dispatcher: SharedDispatcher,
    cleanup: TriggerCleanup,
    webhooks: SharedWebhookUrls,
    failures: SharedFailureSink,
}

impl TriggerDeactivator {
    /// Create a deactivator with the default webhook URL builder and a
    /// tracing failure sink.
    pub fn new(
        resolver: SharedResolver,
        dispatcher: SharedDispatcher,
        jobs: SharedJobStore,
        listeners: SharedListenerRegistry,
    ) -> Self {
        Self {
            resolver,
            dispatcher,
            cleanup: TriggerCleanup::new(jobs, listeners),
            webhooks: Arc::new(WebhookUrlBuilder::default()),
            failures: Arc::new(TracingFailureSink),
        }
    }

    /// Use a different webhook URL source.
    pub fn with_webhook_urls(mut self, webhooks: SharedWebhookUrls) -> Self {
        self.webhooks = webhooks;
        self
    }

    /// Use a different failure sink.
    pub fn with_failure_sink(mut self, failures: SharedFailureSink) -> Self {
        self.failures = failures;
        self
    }

    /// Disable the trigger of `request.flow_version`.
    ///
    /// Returns `Ok(None)` when the trigger is not piece-backed, cannot be
    /// resolved, or its hook failed with `ignore_error` set. Otherwise returns
    /// the worker's response.
    ///
    /// Once a definition is resolved, cleanup runs exactly once after the hook
    /// call settles. A hook failure that is not ignored is recorded on the
    /// failure sink before cleanup starts and returned after it finishes.
    /// A cleanup failure is always returned.
    pub async fn disable(&self, request: DisableRequest) -> Result<Option<HookResponse>> {
        let DisableRequest {
            flow_version,
            project_id,
            simulate,
            ignore_error,
        } = request;

        let Some(trigger) = flow_version.trigger.as_piece() else {
            debug!(flow_version_id = %flow_version.id, "Trigger is not piece-backed, nothing to disable");
            return Ok(None);
        };

        let Some(definition) = self.resolver.resolve(trigger, &project_id).await else {
            debug!(
                flow_version_id = %flow_version.id,
                piece = %trigger.piece_name,
                trigger = %trigger.trigger_name,
                "Piece trigger could not be resolved, nothing to disable"
            );
            return Ok(None);
        };

        let pending = PendingCleanup {
            cleanup: self.cleanup.clone(),
            definition,
            project_id: project_id.clone(),
            flow_version: flow_version.clone(),
        };
        let guard = CleanupGuard::arm(pending.clone());

        let webhook_url = self.webhooks.webhook_url(&flow_version.flow_id, simulate);
        let job = HookJob::on_disable(flow_version, webhook_url, simulate, project_id);
        let dispatched = self.dispatcher.request(job).await;

        let outcome = match dispatched {
            Ok(response) => Ok(Some(response)),
            Err(e) if ignore_error => {
                warn!(flow_version_id = %pending.flow_version.id, error = %e, "On-disable hook failed, ignoring");
                Ok(None)
            }
            Err(e) => {
                self.failures.record(&e);
                Err(e)
            }
        };

        let cleaned = pending.run().await;
        guard.disarm();

        let action = match cleaned {
            Ok(action) => action,
            Err(source) => {
                error!(flow_version_id = %pending.flow_version.id, error = %source, "Trigger cleanup failed");
                return Err(DisableError::Cleanup {
                    source,
                    hook_failure: outcome.err().map(Box::new),
                });
            }
        };

        info!(
            flow_version_id = %pending.flow_version.id,
            strategy = %pending.definition.strategy,
            cleanup = ?action,
            hook_ok = outcome.is_ok(),
            "Trigger disabled"
        );
        outcome.map_err(DisableError::HookExecution)
    }
}
