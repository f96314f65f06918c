//! Placements of shared references.
//!
//! A [`StructInstance`] positions a [`StructReference`] relative to its parent
//! occurrence. One instance may back many occurrences: every occurrence
//! wrapping it registers itself here, and the first one registered serves as
//! the template when the instance is placed again.

use std::rc::Rc;

use cgmath::{Matrix4, Quaternion, Vector3};

use crate::data_structures::{occurrence::OccurrenceId, reference::StructReference};

/// Unique identifier for an instance.
pub type InstanceId = u32;

#[derive(Debug)]
pub struct StructInstance {
    id: InstanceId,
    name: String,
    relative_matrix: Matrix4<f32>,
    reference: Rc<StructReference>,
    // live occurrences in creation order, the head is the first occurrence
    occurrences: Vec<OccurrenceId>,
}

impl StructInstance {
    pub(crate) fn new(
        id: InstanceId,
        name: String,
        reference: Rc<StructReference>,
        relative_matrix: Matrix4<f32>,
    ) -> Self {
        Self {
            id,
            name,
            relative_matrix,
            reference,
            occurrences: Vec::new(),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn relative_matrix(&self) -> Matrix4<f32> {
        self.relative_matrix
    }

    pub(crate) fn set_relative_matrix(&mut self, matrix: Matrix4<f32>) {
        self.relative_matrix = matrix;
    }

    pub fn struct_reference(&self) -> &Rc<StructReference> {
        &self.reference
    }

    pub fn has_struct_occurrence(&self) -> bool {
        !self.occurrences.is_empty()
    }

    /// The canonical occurrence used as clone template.
    pub fn first_occurrence(&self) -> Option<OccurrenceId> {
        self.occurrences.first().copied()
    }

    /// Number of live occurrences wrapping this instance.
    pub fn occurrence_count(&self) -> usize {
        self.occurrences.len()
    }

    pub fn occurrences(&self) -> &[OccurrenceId] {
        &self.occurrences
    }

    pub(crate) fn occurrence_created(&mut self, occurrence: OccurrenceId) {
        debug_assert!(!self.occurrences.contains(&occurrence));
        self.occurrences.push(occurrence);
    }

    /// Forgets `occurrence` and returns how many occurrences remain.
    pub(crate) fn occurrence_deleted(&mut self, occurrence: OccurrenceId) -> usize {
        debug_assert!(self.occurrences.contains(&occurrence));
        self.occurrences.retain(|&id| id != occurrence);
        self.occurrences.len()
    }
}

/// Builds a relative matrix from translation, rotation and non-uniform scale.
///
/// The order of operations is Translation * Rotation * Scale.
pub fn placement_matrix(
    position: Vector3<f32>,
    rotation: Quaternion<f32>,
    scale: Vector3<f32>,
) -> Matrix4<f32> {
    Matrix4::from_translation(position)
        * Matrix4::from(rotation)
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}
