//! Shared types for Flowhook.
//!
//! Flow versions, piece trigger definitions, and the hook job/response pair
//! exchanged with workers. These are used by both the trigger lifecycle
//! coordinator and worker-side executors.

pub mod flow;
pub mod hooks;
pub mod ids;
pub mod piece;

pub use flow::{FlowTrigger, FlowVersion, PieceTrigger};
pub use hooks::{HookJob, HookResponse, HookStatus, TriggerHookType, WorkerJobType};
pub use ids::{FlowId, FlowVersionId, ProjectId};
pub use piece::{PieceTriggerDefinition, RenewConfiguration, TriggerStrategy};
