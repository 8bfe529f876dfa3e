//! Strategy-keyed removal of recurring jobs and event listeners.

use flowhook_types::{FlowVersion, PieceTriggerDefinition, ProjectId, TriggerStrategy};
use tracing::debug;

use crate::error::StoreError;
use crate::traits::{SharedJobStore, SharedListenerRegistry};

/// What cleanup did for a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupAction {
    /// App event listeners for the flow were deleted.
    ListenersDeleted,
    /// The repeating job for the flow version was removed.
    RepeatingJobRemoved,
    /// The strategy keeps no queue or listener state.
    Nothing,
}

impl CleanupAction {
    /// Decide what a trigger with this definition needs removed.
    pub fn for_definition(definition: &PieceTriggerDefinition) -> Self {
        match definition.strategy {
            TriggerStrategy::AppWebhook => CleanupAction::ListenersDeleted,
            TriggerStrategy::Webhook if definition.renews_by_cron() => {
                CleanupAction::RepeatingJobRemoved
            }
            TriggerStrategy::Webhook => CleanupAction::Nothing,
            TriggerStrategy::Polling => CleanupAction::RepeatingJobRemoved,
            TriggerStrategy::Manual => CleanupAction::Nothing,
        }
    }
}

/// Removes the queue and listener state a disabled trigger leaves behind.
#[derive(Clone)]
pub struct TriggerCleanup {
    jobs: SharedJobStore,
    listeners: SharedListenerRegistry,
}

impl TriggerCleanup {
    pub fn new(jobs: SharedJobStore, listeners: SharedListenerRegistry) -> Self {
        Self { jobs, listeners }
    }

    /// Run the cleanup matching the trigger's strategy.
    ///
    /// Both stores remove idempotently, so running this for a trigger that
    /// never scheduled anything is not an error.
    pub async fn run(
        &self,
        definition: &PieceTriggerDefinition,
        project_id: &ProjectId,
        flow_version: &FlowVersion,
    ) -> Result<CleanupAction, StoreError> {
        let action = CleanupAction::for_definition(definition);
        match action {
            CleanupAction::ListenersDeleted => {
                self.listeners
                    .delete_listeners(project_id, &flow_version.flow_id)
                    .await?;
            }
            CleanupAction::RepeatingJobRemoved => {
                self.jobs.remove_repeating(&flow_version.id).await?;
            }
            CleanupAction::Nothing => {}
        }

        debug!(
            flow_version_id = %flow_version.id,
            strategy = %definition.strategy,
            action = ?action,
            "Trigger cleanup complete"
        );
        Ok(action)
    }
}
