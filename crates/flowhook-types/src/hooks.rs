//! Trigger hook jobs and worker responses.
//!
//! These types cross the boundary between the API side (which submits hook
//! jobs) and the worker side (which runs the piece code and replies).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::flow::FlowVersion;
use crate::ids::ProjectId;

/// Lifecycle hook a worker runs for a piece trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerHookType {
    /// Tear down whatever the piece registered when the trigger was enabled.
    OnDisable,
}

impl std::fmt::Display for TriggerHookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerHookType::OnDisable => write!(f, "ON_DISABLE"),
        }
    }
}

/// Kind of interactive job a worker can be asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerJobType {
    /// Execute a trigger lifecycle hook.
    ExecuteTriggerHook,
}

/// A request for a worker to run one trigger hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookJob {
    /// Correlates the reply with the request.
    pub request_id: Uuid,
    /// Always [`WorkerJobType::ExecuteTriggerHook`] for hook jobs.
    pub job_type: WorkerJobType,
    /// Which hook to run.
    pub hook_type: TriggerHookType,
    /// The flow version whose trigger the hook belongs to.
    pub flow_version: FlowVersion,
    /// Public webhook URL the piece registered (or should register).
    pub webhook_url: String,
    /// Whether this is a test/simulation invocation.
    pub test: bool,
    /// Owning project.
    pub project_id: ProjectId,
}

impl HookJob {
    /// Build an on-disable hook job with a fresh request id.
    pub fn on_disable(
        flow_version: FlowVersion,
        webhook_url: String,
        test: bool,
        project_id: ProjectId,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            job_type: WorkerJobType::ExecuteTriggerHook,
            hook_type: TriggerHookType::OnDisable,
            flow_version,
            webhook_url,
            test,
            project_id,
        }
    }
}

/// Outcome reported by the worker's engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookStatus {
    Ok,
    Error,
    Timeout,
    MemoryIssue,
    InternalError,
}

impl std::fmt::Display for HookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookStatus::Ok => write!(f, "OK"),
            HookStatus::Error => write!(f, "ERROR"),
            HookStatus::Timeout => write!(f, "TIMEOUT"),
            HookStatus::MemoryIssue => write!(f, "MEMORY_ISSUE"),
            HookStatus::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Structured reply from a worker after running a hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookResponse {
    pub status: HookStatus,
    /// Hook-specific result payload.
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    pub standard_output: String,
    #[serde(default)]
    pub standard_error: String,
}

impl HookResponse {
    /// A successful response carrying `result`.
    pub fn ok(result: serde_json::Value) -> Self {
        Self {
            status: HookStatus::Ok,
            result,
            standard_output: String::new(),
            standard_error: String::new(),
        }
    }

    /// A failed response with the given status and error output.
    pub fn failed(status: HookStatus, standard_error: impl Into<String>) -> Self {
        Self {
            status,
            result: serde_json::Value::Null,
            standard_output: String::new(),
            standard_error: standard_error.into(),
        }
    }

    /// Whether the hook completed successfully.
    pub fn is_ok(&self) -> bool {
        self.status == HookStatus::Ok
    }
}
