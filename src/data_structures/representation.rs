//! Representation templates: the drawable form a reference can carry.
//!
//! Geometry itself lives with the importers; a representation only keeps
//! what the scene graph needs to answer queries: the local bounding box,
//! face and vertex counts, and the materials used.

use std::rc::Rc;

use crate::data_structures::{
    bounding_box::BoundingBox,
    material::{Material, MaterialSet, material_set},
};

#[derive(Clone, Debug)]
pub struct Representation {
    pub name: String,
    /// Bounds in the representation's own coordinate system.
    pub bounding_box: BoundingBox,
    pub face_count: usize,
    pub vertex_count: usize,
    pub materials: Vec<Rc<Material>>,
}

impl Representation {
    pub fn new(name: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            name: name.into(),
            bounding_box,
            face_count: 0,
            vertex_count: 0,
            materials: Vec::new(),
        }
    }

    pub fn with_counts(mut self, face_count: usize, vertex_count: usize) -> Self {
        self.face_count = face_count;
        self.vertex_count = vertex_count;
        self
    }

    pub fn with_material(mut self, material: Rc<Material>) -> Self {
        self.materials.push(material);
        self
    }

    pub fn material_set(&self) -> MaterialSet {
        material_set(&self.materials)
    }
}
