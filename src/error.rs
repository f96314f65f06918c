//! Error types for scene-graph operations.

use thiserror::Error;

use crate::{
    data_structures::{instance::InstanceId, occurrence::OccurrenceId},
    world_handle::WorldHandleId,
};

/// Violated preconditions of tree operations.
///
/// These signal a bug in the calling layer rather than a runtime condition
/// to recover from; the graph is left unchanged when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("unknown occurrence {0}")]
    UnknownOccurrence(OccurrenceId),

    #[error("unknown instance {0}")]
    UnknownInstance(InstanceId),

    #[error("unknown world handle {0}")]
    UnknownWorldHandle(WorldHandleId),

    #[error("occurrence {0} already has a parent")]
    NotOrphan(OccurrenceId),

    #[error("occurrence {0} has no parent")]
    AlreadyOrphan(OccurrenceId),

    #[error(
        "occurrence {child} belongs to world {child_world:?}, \
         parent {parent} to world {parent_world:?}"
    )]
    WorldHandleMismatch {
        parent: OccurrenceId,
        parent_world: Option<WorldHandleId>,
        child: OccurrenceId,
        child_world: Option<WorldHandleId>,
    },

    #[error("attaching occurrence {child} under {parent} would create a cycle")]
    WouldCreateCycle {
        parent: OccurrenceId,
        child: OccurrenceId,
    },

    #[error("occurrence {0} is listed more than once")]
    DuplicateChild(OccurrenceId),
}

/// Result type alias using [`SceneError`].
pub type Result<T> = std::result::Result<T, SceneError>;
