//! Shared shape descriptions.

use std::{cell::RefCell, rc::Rc};

use crate::data_structures::{
    material::MaterialSet,
    representation::Representation,
};

/// Unique identifier for a reference.
pub type ReferenceId = u32;

/// The shared description of a renderable shape.
///
/// A reference is shared by every [`StructInstance`](super::instance::StructInstance)
/// placing it, through an `Rc`. All counts are derived from the optional
/// representation template and are zero without one. The template can be
/// attached after the reference was shared, for importers that fill shapes
/// lazily.
#[derive(Debug)]
pub struct StructReference {
    id: ReferenceId,
    name: String,
    representation: RefCell<Option<Rc<Representation>>>,
}

impl StructReference {
    /// A reference without representation, i.e. an assembly node.
    pub fn new(id: ReferenceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            representation: RefCell::new(None),
        }
    }

    /// A reference carrying a representation template, i.e. a part.
    pub fn with_representation(
        id: ReferenceId,
        name: impl Into<String>,
        representation: Representation,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            representation: RefCell::new(Some(Rc::new(representation))),
        }
    }

    pub fn id(&self) -> ReferenceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_representation(&self) -> bool {
        self.representation.borrow().is_some()
    }

    /// The representation template, shared with every drawable made from it.
    pub fn instance_representation(&self) -> Option<Rc<Representation>> {
        self.representation.borrow().clone()
    }

    /// Replaces the representation template.
    ///
    /// Existing occurrences keep their flags; call
    /// `SceneGraph::check_for_representation` on them to materialize it.
    pub fn set_representation(&self, representation: Representation) {
        *self.representation.borrow_mut() = Some(Rc::new(representation));
    }

    pub fn number_of_faces(&self) -> usize {
        self.representation
            .borrow()
            .as_ref()
            .map_or(0, |rep| rep.face_count)
    }

    pub fn number_of_vertices(&self) -> usize {
        self.representation
            .borrow()
            .as_ref()
            .map_or(0, |rep| rep.vertex_count)
    }

    pub fn number_of_materials(&self) -> usize {
        self.material_set().len()
    }

    pub fn material_set(&self) -> MaterialSet {
        self.representation
            .borrow()
            .as_ref()
            .map(|rep| rep.material_set())
            .unwrap_or_default()
    }
}
