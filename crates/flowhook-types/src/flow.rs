//! Flow versions and the triggers configured on them.

use serde::{Deserialize, Serialize};

use crate::ids::{FlowId, FlowVersionId};

/// An immutable snapshot of a flow.
///
/// Owned by the flow versioning subsystem; the trigger lifecycle code only
/// reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowVersion {
    /// Version identifier (the key for recurring jobs).
    pub id: FlowVersionId,
    /// Flow identifier (the key for webhooks and event listeners).
    pub flow_id: FlowId,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// The trigger that starts this version.
    pub trigger: FlowTrigger,
}

impl FlowVersion {
    /// Create a flow version with an empty display name.
    pub fn new(
        id: impl Into<FlowVersionId>,
        flow_id: impl Into<FlowId>,
        trigger: FlowTrigger,
    ) -> Self {
        Self {
            id: id.into(),
            flow_id: flow_id.into(),
            display_name: String::new(),
            trigger,
        }
    }
}

/// The activation mechanism configured on a flow version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowTrigger {
    /// A trigger implemented by a piece (webhook, polling, or app event).
    Piece(PieceTrigger),
    /// No trigger configured yet; the flow runs manually.
    Empty,
}

impl FlowTrigger {
    /// The piece trigger, if this trigger is piece-backed.
    pub fn as_piece(&self) -> Option<&PieceTrigger> {
        match self {
            FlowTrigger::Piece(trigger) => Some(trigger),
            FlowTrigger::Empty => None,
        }
    }
}

/// A reference to a trigger exposed by a specific piece version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceTrigger {
    /// Step name inside the flow (usually `trigger`).
    pub name: String,
    /// Package name of the piece, e.g. `@flowhook/piece-github`.
    pub piece_name: String,
    /// Piece version the flow was built against.
    pub piece_version: String,
    /// Name of the trigger within the piece.
    pub trigger_name: String,
    /// User-supplied trigger input.
    #[serde(default)]
    pub input: serde_json::Value,
}

impl PieceTrigger {
    /// Create a piece trigger reference with empty input.
    pub fn new(
        piece_name: impl Into<String>,
        piece_version: impl Into<String>,
        trigger_name: impl Into<String>,
    ) -> Self {
        Self {
            name: "trigger".to_string(),
            piece_name: piece_name.into(),
            piece_version: piece_version.into(),
            trigger_name: trigger_name.into(),
            input: serde_json::Value::Null,
        }
    }
}
