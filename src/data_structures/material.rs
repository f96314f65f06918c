//! Shared materials and material sets.

use std::{collections::BTreeMap, rc::Rc};

/// Unique identifier for a material.
pub type MaterialId = u32;

/// Surface description shared between representations.
///
/// Materials are compared by id: two representations pointing at the same
/// material id share it, which is what material-count aggregation relies on.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub diffuse: [f32; 4],
}

impl Material {
    pub fn new(id: MaterialId, name: impl Into<String>, diffuse: [f32; 4]) -> Self {
        Self {
            id,
            name: name.into(),
            diffuse,
        }
    }
}

/// Deduplicated set of materials, keyed by material id.
pub type MaterialSet = BTreeMap<MaterialId, Rc<Material>>;

/// Builds a [`MaterialSet`] from a list that may contain duplicates.
pub fn material_set<'a>(materials: impl IntoIterator<Item = &'a Rc<Material>>) -> MaterialSet {
    materials
        .into_iter()
        .map(|material| (material.id, Rc::clone(material)))
        .collect()
}
