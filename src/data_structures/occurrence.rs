//! Occurrences: the nodes of the assembly tree.
//!
//! An occurrence is one placed appearance of a [`StructInstance`]. It owns
//! its children, links back to its parent and to the world handle it is
//! registered with, and caches its absolute matrix. All of these links are
//! ids into the owning [`SceneGraph`]; the operations that keep them
//! consistent live there.
//!
//! [`StructInstance`]: super::instance::StructInstance
//! [`SceneGraph`]: super::scene_graph::SceneGraph

use cgmath::Matrix4;

use crate::{data_structures::instance::InstanceId, world_handle::WorldHandleId};

/// Unique identifier for an occurrence, also the key of its drawable.
pub type OccurrenceId = u32;

#[derive(Clone, Debug)]
pub struct StructOccurrence {
    pub(crate) id: OccurrenceId,
    pub(crate) name: String,
    pub(crate) instance: InstanceId,
    pub(crate) parent: Option<OccurrenceId>,
    pub(crate) children: Vec<OccurrenceId>,
    pub(crate) world_handle: Option<WorldHandleId>,
    pub(crate) absolute_matrix: Matrix4<f32>,
    // the aggregate queries delegate to the reference once this is set
    pub(crate) representation_decided: bool,
    // a drawable keyed by `id` exists in the world's collection while attached
    pub(crate) has_drawable: bool,
}

impl StructOccurrence {
    pub(crate) fn new(
        id: OccurrenceId,
        name: String,
        instance: InstanceId,
        world_handle: Option<WorldHandleId>,
        absolute_matrix: Matrix4<f32>,
        has_representation: bool,
    ) -> Self {
        Self {
            id,
            name,
            instance,
            parent: None,
            children: Vec::new(),
            world_handle,
            absolute_matrix,
            representation_decided: has_representation,
            has_drawable: has_representation,
        }
    }

    pub fn id(&self) -> OccurrenceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn parent(&self) -> Option<OccurrenceId> {
        self.parent
    }

    /// True if the occurrence has no parent.
    pub fn is_orphan(&self) -> bool {
        self.parent.is_none()
    }

    pub fn has_child(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn children(&self) -> &[OccurrenceId] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<OccurrenceId> {
        self.children.get(index).copied()
    }

    pub fn world_handle(&self) -> Option<WorldHandleId> {
        self.world_handle
    }

    pub fn is_attached(&self) -> bool {
        self.world_handle.is_some()
    }

    /// Cached product of the relative matrices from the root down to here.
    pub fn absolute_matrix(&self) -> Matrix4<f32> {
        self.absolute_matrix
    }

    /// True once the occurrence's representation has been decided.
    ///
    /// Aggregate queries then delegate to the reference instead of the
    /// children. This does not imply that anything is drawn: see
    /// [`StructOccurrence::has_drawable`].
    pub fn has_representation(&self) -> bool {
        self.representation_decided
    }

    /// True if the occurrence puts a drawable into its world's collection.
    pub fn has_drawable(&self) -> bool {
        self.has_drawable
    }
}
