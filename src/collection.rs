//! The live set of drawables of a world.
//!
//! A [`Collection`] stores one [`Drawable`] per occurrence that has a
//! representation, keyed by the occurrence id. It also tracks which drawables
//! belong to a shading group and which are selected, so that a renderer can
//! batch them (see [`crate::render`]).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::warn;

use crate::{
    data_structures::{bounding_box::BoundingBox, drawable::Drawable, occurrence::OccurrenceId},
    render::Render,
};

/// Identifier of a shader program owned by the renderer.
pub type ShaderId = u32;

/// Shader id meaning "no shading group".
pub const NO_SHADER: ShaderId = 0;

#[derive(Debug, Default)]
pub struct Collection {
    drawables: BTreeMap<OccurrenceId, Drawable>,
    shading_groups: HashMap<OccurrenceId, ShaderId>,
    selection: BTreeSet<OccurrenceId>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `drawable`, filing it under `shader_id` unless it is [`NO_SHADER`].
    ///
    /// Returns `false` and leaves the collection untouched if a drawable with
    /// the same id is already present.
    pub fn add(&mut self, drawable: Drawable, shader_id: ShaderId) -> bool {
        let id = drawable.id();
        if self.drawables.contains_key(&id) {
            warn!("Drawable {} ({}) is already in the collection.", id, drawable.name());
            return false;
        }
        if shader_id != NO_SHADER {
            self.shading_groups.insert(id, shader_id);
        }
        if drawable.is_selected() {
            self.selection.insert(id);
        }
        self.drawables.insert(id, drawable);
        true
    }

    /// Removes the drawable `id` together with its group and selection state.
    pub fn remove(&mut self, id: OccurrenceId) -> Option<Drawable> {
        self.shading_groups.remove(&id);
        self.selection.remove(&id);
        self.drawables.remove(&id)
    }

    pub fn contains(&self, id: OccurrenceId) -> bool {
        self.drawables.contains_key(&id)
    }

    pub fn instance_handle(&self, id: OccurrenceId) -> Option<&Drawable> {
        self.drawables.get(&id)
    }

    pub fn instance_handle_mut(&mut self, id: OccurrenceId) -> Option<&mut Drawable> {
        self.drawables.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// All drawables, in id order.
    pub fn drawables(&self) -> impl Iterator<Item = &Drawable> {
        self.drawables.values()
    }

    pub fn is_in_a_shading_group(&self, id: OccurrenceId) -> bool {
        self.shading_groups.contains_key(&id)
    }

    pub fn shading_group(&self, id: OccurrenceId) -> Option<ShaderId> {
        self.shading_groups.get(&id).copied()
    }

    /// Moves a drawable to another shading group; [`NO_SHADER`] removes it
    /// from any group.
    pub fn change_shading_group(&mut self, id: OccurrenceId, shader_id: ShaderId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if shader_id == NO_SHADER {
            self.shading_groups.remove(&id);
        } else {
            self.shading_groups.insert(id, shader_id);
        }
        true
    }

    pub fn select(&mut self, id: OccurrenceId) -> bool {
        match self.drawables.get_mut(&id) {
            Some(drawable) => {
                drawable.set_selected(true);
                self.selection.insert(id);
                true
            }
            None => false,
        }
    }

    pub fn unselect(&mut self, id: OccurrenceId) -> bool {
        match self.drawables.get_mut(&id) {
            Some(drawable) => {
                drawable.set_selected(false);
                self.selection.remove(&id)
            }
            None => false,
        }
    }

    pub fn unselect_all(&mut self) {
        for id in std::mem::take(&mut self.selection) {
            if let Some(drawable) = self.drawables.get_mut(&id) {
                drawable.set_selected(false);
            }
        }
    }

    pub fn is_selected(&self, id: OccurrenceId) -> bool {
        self.selection.contains(&id)
    }

    pub fn selection(&self) -> impl Iterator<Item = OccurrenceId> + '_ {
        self.selection.iter().copied()
    }

    pub fn selection_size(&self) -> usize {
        self.selection.len()
    }

    pub fn set_visibility(&mut self, id: OccurrenceId, visible: bool) -> bool {
        self.drawables
            .get_mut(&id)
            .map(|drawable| drawable.set_visibility(visible))
            .is_some()
    }

    /// Union of the boxes of all visible drawables.
    pub fn bounding_box(&self) -> BoundingBox {
        self.drawables
            .values()
            .filter(|drawable| drawable.is_visible())
            .fold(BoundingBox::empty(), |acc, drawable| {
                acc.union(&drawable.bounding_box())
            })
    }

    /// Visible drawables batched for a renderer.
    pub fn render(&self) -> Render<'_> {
        Render::from(self)
    }
}
