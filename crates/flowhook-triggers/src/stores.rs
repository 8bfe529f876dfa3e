//! In-memory recurring job store and event listener registry.
//!
//! Used for single-process deployments and tests. Both stores are safe to
//! share across tasks; each operation takes a short non-async lock.

use std::collections::HashMap;

use async_trait::async_trait;
use flowhook_types::{FlowId, FlowVersionId, ProjectId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::StoreError;
use crate::traits::{EventListenerRegistry, RecurringJobStore};

// ─────────────────────────────────────────────────────────────────────────────
// Recurring jobs
// ─────────────────────────────────────────────────────────────────────────────

/// A scheduled repeating job for one flow version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatingJob {
    pub flow_version_id: FlowVersionId,
    /// Five-field cron expression.
    pub cron_expression: String,
}

/// Recurring job store backed by a map keyed by flow version id.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: Mutex<HashMap<FlowVersionId, RepeatingJob>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule (or reschedule) the repeating job for a flow version.
    pub fn add_repeating(
        &self,
        flow_version_id: impl Into<FlowVersionId>,
        cron_expression: impl Into<String>,
    ) {
        let job = RepeatingJob {
            flow_version_id: flow_version_id.into(),
            cron_expression: cron_expression.into(),
        };
        trace!(flow_version_id = %job.flow_version_id, cron = %job.cron_expression, "Repeating job added");
        self.jobs.lock().insert(job.flow_version_id.clone(), job);
    }

    /// The repeating job for a flow version, if any.
    pub fn get(&self, flow_version_id: &FlowVersionId) -> Option<RepeatingJob> {
        self.jobs.lock().get(flow_version_id).cloned()
    }

    pub fn contains(&self, flow_version_id: &FlowVersionId) -> bool {
        self.jobs.lock().contains_key(flow_version_id)
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecurringJobStore for InMemoryJobStore {
    async fn remove_repeating(&self, flow_version_id: &FlowVersionId) -> Result<(), StoreError> {
        let removed = self.jobs.lock().remove(flow_version_id).is_some();
        debug!(flow_version_id = %flow_version_id, removed, "Remove repeating job");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event listeners
// ─────────────────────────────────────────────────────────────────────────────

/// An app event subscription routing pushed events to a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEventListener {
    pub project_id: ProjectId,
    pub flow_id: FlowId,
    /// App that pushes the events, e.g. `slack`.
    pub app_name: String,
    /// Event name within the app.
    pub event: String,
    /// Value identifying the subscriber on the app side (team id, account id).
    pub identifier_value: String,
}

impl AppEventListener {
    pub fn new(
        project_id: impl Into<ProjectId>,
        flow_id: impl Into<FlowId>,
        app_name: impl Into<String>,
        event: impl Into<String>,
        identifier_value: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            flow_id: flow_id.into(),
            app_name: app_name.into(),
            event: event.into(),
            identifier_value: identifier_value.into(),
        }
    }
}

/// Event listener registry backed by a map keyed by (project, flow).
#[derive(Debug, Default)]
pub struct InMemoryListenerRegistry {
    listeners: Mutex<HashMap<(ProjectId, FlowId), Vec<AppEventListener>>>,
}

impl InMemoryListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Identical listeners are stored once.
    pub fn add_listener(&self, listener: AppEventListener) {
        let key = (listener.project_id.clone(), listener.flow_id.clone());
        let mut listeners = self.listeners.lock();
        let entry = listeners.entry(key).or_default();
        if !entry.contains(&listener) {
            entry.push(listener);
        }
    }

    /// Listeners registered for a flow.
    pub fn listeners_for(&self, project_id: &ProjectId, flow_id: &FlowId) -> Vec<AppEventListener> {
        self.listeners
            .lock()
            .get(&(project_id.clone(), flow_id.clone()))
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of listeners across all flows.
    pub fn len(&self) -> usize {
        self.listeners.lock().values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EventListenerRegistry for InMemoryListenerRegistry {
    async fn delete_listeners(
        &self,
        project_id: &ProjectId,
        flow_id: &FlowId,
    ) -> Result<(), StoreError> {
        let removed = self
            .listeners
            .lock()
            .remove(&(project_id.clone(), flow_id.clone()))
            .map_or(0, |v| v.len());
        debug!(project_id = %project_id, flow_id = %flow_id, removed, "Delete app event listeners");
        Ok(())
    }
}
