//! Collaborator interfaces used by the trigger lifecycle coordinator.
//!
//! Every trait is object-safe so collaborators can be shared as
//! `Arc<dyn Trait>` across concurrently running deactivations.

use std::sync::Arc;

use async_trait::async_trait;
use flowhook_types::{
    FlowId, FlowVersionId, HookJob, HookResponse, PieceTrigger, PieceTriggerDefinition, ProjectId,
};

use crate::error::{DispatchError, StoreError};

/// Looks up the piece-published definition of a trigger.
#[async_trait]
pub trait TriggerResolver: Send + Sync {
    /// Resolve the definition, or `None` if the piece, version, or trigger
    /// name is unknown. Lookups have no side effects.
    async fn resolve(
        &self,
        trigger: &PieceTrigger,
        project_id: &ProjectId,
    ) -> Option<PieceTriggerDefinition>;
}

/// Request/response transport to worker processes.
#[async_trait]
pub trait HookDispatcher: Send + Sync {
    /// Submit a hook job and wait for the worker's reply.
    ///
    /// Implementations bound the wait themselves; callers make one attempt.
    async fn request(&self, job: HookJob) -> Result<HookResponse, DispatchError>;
}

/// Computes the public webhook URL for a flow.
pub trait WebhookUrls: Send + Sync {
    fn webhook_url(&self, flow_id: &FlowId, simulate: bool) -> String;
}

/// Store of scheduled repeating jobs keyed by flow version.
#[async_trait]
pub trait RecurringJobStore: Send + Sync {
    /// Remove the repeating job for a flow version. Removing a job that does
    /// not exist succeeds.
    async fn remove_repeating(&self, flow_version_id: &FlowVersionId) -> Result<(), StoreError>;
}

/// Registry of app event subscriptions keyed by project and flow.
#[async_trait]
pub trait EventListenerRegistry: Send + Sync {
    /// Delete every listener for the flow. Deleting nothing succeeds.
    async fn delete_listeners(
        &self,
        project_id: &ProjectId,
        flow_id: &FlowId,
    ) -> Result<(), StoreError>;
}

/// Process-wide sink for unexpected failures (error tracker, alerting).
pub trait FailureSink: Send + Sync {
    /// Record an error. Must not block or fail.
    fn record(&self, error: &DispatchError);
}

pub type SharedResolver = Arc<dyn TriggerResolver>;
pub type SharedDispatcher = Arc<dyn HookDispatcher>;
pub type SharedWebhookUrls = Arc<dyn WebhookUrls>;
pub type SharedJobStore = Arc<dyn RecurringJobStore>;
pub type SharedListenerRegistry = Arc<dyn EventListenerRegistry>;
pub type SharedFailureSink = Arc<dyn FailureSink>;
