//! Render composition for external renderers.
//!
//! The scene graph does not draw anything itself. A renderer asks a
//! [`Collection`] (or several, one per world) for a [`Render`] value and
//! sorts it into batches: plain drawables, drawables grouped by shading
//! group, and selected drawables that get a highlight pass.
//!
//! # Key types
//!
//! - [`Render<'a>`] describes what to draw, possibly composed
//! - [`Instanced<'a>`] pairs a drawable with its GPU-ready [`DrawableRaw`]
//!

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    collection::{Collection, ShaderId},
    data_structures::{
        drawable::{Drawable, DrawableRaw},
        occurrence::OccurrenceId,
    },
    world_handle::WorldHandleId,
};

/// A drawable ready for upload: the entry itself and its raw instance data.
pub struct Instanced<'a> {
    pub drawable: &'a Drawable,
    pub raw: DrawableRaw,
}

impl<'a> From<&'a Drawable> for Instanced<'a> {
    fn from(drawable: &'a Drawable) -> Self {
        Self {
            drawable,
            raw: drawable.to_raw(),
        }
    }
}

/// Specifies what should be rendered and how it is batched.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Default(Vec<Instanced>)` renders drawables with the default program
/// - `Shaded(ShaderId, Vec<Instanced>)` renders a shading group with its program
/// - `Selected(Vec<Instanced>)` renders selected drawables with the highlight pass
/// - `Composed(Vec<Render>)` recursively renders a composition of renders
///
pub enum Render<'a> {
    None,
    Default(Vec<Instanced<'a>>),
    Shaded(ShaderId, Vec<Instanced<'a>>),
    Selected(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Number of drawables in this render, composed ones included.
    pub fn len(&self) -> usize {
        match self {
            Render::None => 0,
            Render::Default(vec) | Render::Shaded(_, vec) | Render::Selected(vec) => vec.len(),
            Render::Composed(renders) => renders.iter().map(Render::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occurrence ids of every drawable in this render.
    pub fn ids(&self) -> Vec<OccurrenceId> {
        let mut ids = Vec::with_capacity(self.len());
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<OccurrenceId>) {
        match self {
            Render::None => (),
            Render::Default(vec) | Render::Shaded(_, vec) | Render::Selected(vec) => {
                ids.extend(vec.iter().map(|instanced| instanced.drawable.id()))
            }
            Render::Composed(renders) => renders.iter().for_each(|render| render.collect_ids(ids)),
        }
    }

    /// Map occurrence ids to the worlds that render them, for picking.
    ///
    /// Walks the render tree and records `world` for every drawable in it.
    pub fn map_ids(
        &self,
        world: WorldHandleId,
        map: &mut HashMap<OccurrenceId, HashSet<WorldHandleId>>,
    ) {
        for id in self.ids() {
            map.entry(id)
                .and_modify(|worlds| _ = worlds.insert(world))
                .or_insert([world].into());
        }
    }

    /// Sorts this render into per-program batches.
    pub fn into_batches(
        self,
        defaults: &mut Vec<Instanced<'a>>,
        shaded: &mut BTreeMap<ShaderId, Vec<Instanced<'a>>>,
        selected: &mut Vec<Instanced<'a>>,
    ) {
        match self {
            Render::None => (),
            Render::Default(mut vec) => defaults.append(&mut vec),
            Render::Shaded(shader, mut vec) => shaded.entry(shader).or_default().append(&mut vec),
            Render::Selected(mut vec) => selected.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.into_batches(defaults, shaded, selected)),
        }
    }
}

impl<'a> From<&'a Collection> for Render<'a> {
    fn from(collection: &'a Collection) -> Self {
        let mut defaults = Vec::new();
        let mut shaded: BTreeMap<ShaderId, Vec<Instanced<'a>>> = BTreeMap::new();
        let mut selected = Vec::new();
        for drawable in collection.drawables().filter(|d| d.is_visible()) {
            if drawable.is_selected() {
                selected.push(Instanced::from(drawable));
            } else if let Some(shader) = collection.shading_group(drawable.id()) {
                shaded.entry(shader).or_default().push(Instanced::from(drawable));
            } else {
                defaults.push(Instanced::from(drawable));
            }
        }

        let mut renders = Vec::new();
        if !defaults.is_empty() {
            renders.push(Render::Default(defaults));
        }
        renders.extend(shaded.into_iter().map(|(shader, vec)| Render::Shaded(shader, vec)));
        if !selected.is_empty() {
            renders.push(Render::Selected(selected));
        }
        match renders.len() {
            0 => Render::None,
            1 => renders.remove(0),
            _ => Render::Composed(renders),
        }
    }
}
