//! In-memory piece registry used to resolve trigger definitions.

use std::collections::HashMap;

use async_trait::async_trait;
use flowhook_types::{PieceTrigger, PieceTriggerDefinition, ProjectId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::traits::TriggerResolver;

/// Published metadata for one version of a piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceMetadata {
    pub name: String,
    pub version: String,
    /// Trigger definitions keyed by trigger name.
    #[serde(default)]
    pub triggers: HashMap<String, PieceTriggerDefinition>,
}

impl PieceMetadata {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            triggers: HashMap::new(),
        }
    }

    /// Add a trigger, keyed by its definition name.
    pub fn with_trigger(mut self, definition: PieceTriggerDefinition) -> Self {
        self.triggers.insert(definition.name.clone(), definition);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PieceKey {
    /// `None` for pieces available to every project.
    project_id: Option<ProjectId>,
    name: String,
    version: String,
}

/// Resolves trigger definitions from registered piece metadata.
///
/// Pieces can be registered for every project or for a single one; a
/// project-scoped registration shadows the global one for that project.
#[derive(Debug, Default)]
pub struct PieceRegistry {
    pieces: RwLock<HashMap<PieceKey, PieceMetadata>>,
}

impl PieceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a piece for every project, replacing a previous registration.
    pub fn register(&self, piece: PieceMetadata) {
        self.insert(None, piece);
    }

    /// Register a piece visible only to `project_id`.
    pub fn register_for_project(&self, project_id: ProjectId, piece: PieceMetadata) {
        self.insert(Some(project_id), piece);
    }

    /// Number of registered piece versions.
    pub fn len(&self) -> usize {
        self.pieces.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, project_id: Option<ProjectId>, piece: PieceMetadata) {
        let key = PieceKey {
            project_id,
            name: piece.name.clone(),
            version: piece.version.clone(),
        };
        debug!(piece = %key.name, version = %key.version, triggers = piece.triggers.len(), "Piece registered");
        self.pieces.write().insert(key, piece);
    }

    fn lookup(&self, trigger: &PieceTrigger, project_id: &ProjectId) -> Option<PieceTriggerDefinition> {
        let pieces = self.pieces.read();
        let scoped = PieceKey {
            project_id: Some(project_id.clone()),
            name: trigger.piece_name.clone(),
            version: trigger.piece_version.clone(),
        };
        let global = PieceKey {
            project_id: None,
            ..scoped.clone()
        };

        let piece = pieces.get(&scoped).or_else(|| pieces.get(&global))?;
        piece.triggers.get(&trigger.trigger_name).cloned()
    }
}

#[async_trait]
impl TriggerResolver for PieceRegistry {
    async fn resolve(
        &self,
        trigger: &PieceTrigger,
        project_id: &ProjectId,
    ) -> Option<PieceTriggerDefinition> {
        let definition = self.lookup(trigger, project_id);
        trace!(
            piece = %trigger.piece_name,
            version = %trigger.piece_version,
            trigger = %trigger.trigger_name,
            found = definition.is_some(),
            "Resolved piece trigger"
        );
        definition
    }
}
