//! World handles: the binding between a set of occurrences and a collection.

use std::collections::BTreeSet;

use log::{trace, warn};

use crate::{
    collection::{Collection, ShaderId},
    data_structures::{drawable::Drawable, occurrence::OccurrenceId},
};

/// Unique identifier for a world handle.
pub type WorldHandleId = u32;

/// Registry of the occurrences attached to one world, with their collection.
///
/// Occurrences do not touch the collection directly; they register and
/// unregister through the handle, which keeps the registry and the drawables
/// in step.
#[derive(Debug)]
pub struct WorldHandle {
    id: WorldHandleId,
    occurrences: BTreeSet<OccurrenceId>,
    collection: Collection,
}

impl WorldHandle {
    pub(crate) fn new(id: WorldHandleId) -> Self {
        Self {
            id,
            occurrences: BTreeSet::new(),
            collection: Collection::new(),
        }
    }

    pub fn id(&self) -> WorldHandleId {
        self.id
    }

    /// Registers `occurrence`, adding its drawable (if it has one) to the
    /// collection under `shader_id`, selected if `selected`.
    pub fn add_occurrence(
        &mut self,
        occurrence: OccurrenceId,
        drawable: Option<Drawable>,
        selected: bool,
        shader_id: ShaderId,
    ) {
        if !self.occurrences.insert(occurrence) {
            warn!(
                "Occurrence {} is already registered with world {}.",
                occurrence, self.id
            );
            return;
        }
        trace!("world {}: add occurrence {}", self.id, occurrence);
        if let Some(drawable) = drawable {
            self.collection.add(drawable, shader_id);
            if selected {
                self.collection.select(occurrence);
            }
        }
    }

    /// Unregisters `occurrence` and removes its drawable, if any.
    pub fn remove_occurrence(&mut self, occurrence: OccurrenceId) -> bool {
        trace!("world {}: remove occurrence {}", self.id, occurrence);
        self.collection.remove(occurrence);
        self.occurrences.remove(&occurrence)
    }

    pub fn contains_occurrence(&self, occurrence: OccurrenceId) -> bool {
        self.occurrences.contains(&occurrence)
    }

    pub fn occurrence_count(&self) -> usize {
        self.occurrences.len()
    }

    /// Registered occurrences, in id order.
    pub fn occurrences(&self) -> impl Iterator<Item = OccurrenceId> + '_ {
        self.occurrences.iter().copied()
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut Collection {
        &mut self.collection
    }
}
