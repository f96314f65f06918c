//! Scene graph and hierarchical assembly organization.
//!
//! The [`SceneGraph`] is the arena that owns every occurrence, every instance
//! and every world handle. Occurrences refer to each other, to their instance
//! and to their world handle by id, so every structural operation goes
//! through the graph, which keeps these invariants:
//!
//! - a subtree never straddles two world handles
//! - an attached occurrence with a drawable has exactly one drawable, keyed by
//!   its id, in its world's collection, carrying its absolute matrix
//! - absolute matrices are consistent with the parent chain after every
//!   operation, except between [`SceneGraph::attach_children`] and
//!   [`SceneGraph::commit_transforms`]
//! - an instance lists exactly the live occurrences wrapping it, and is
//!   released with the last of them

use std::{collections::HashMap, rc::Rc};

use cgmath::Matrix4;
use log::{debug, log, trace};

use crate::{
    collection::{Collection, NO_SHADER, ShaderId},
    context::Context,
    data_structures::{
        bounding_box::BoundingBox,
        drawable::Drawable,
        instance::{InstanceId, StructInstance},
        material::MaterialSet,
        occurrence::{OccurrenceId, StructOccurrence},
        reference::StructReference,
    },
    error::{Result, SceneError},
    world_handle::{WorldHandle, WorldHandleId},
};

/// Children linked by [`SceneGraph::attach_children`] whose transforms and
/// world registration are not yet up to date.
///
/// Hand it to [`SceneGraph::commit_transforms`] once the bulk insertion is
/// done.
#[must_use = "attached children keep stale transforms until committed"]
#[derive(Debug)]
pub struct PendingTransforms {
    parent: OccurrenceId,
    children: Vec<OccurrenceId>,
}

impl PendingTransforms {
    pub fn parent(&self) -> OccurrenceId {
        self.parent
    }

    pub fn children(&self) -> &[OccurrenceId] {
        &self.children
    }
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    ctx: Context,
    occurrences: HashMap<OccurrenceId, StructOccurrence>,
    instances: HashMap<InstanceId, StructInstance>,
    worlds: HashMap<WorldHandleId, WorldHandle>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::with_context(Context::new())
    }

    pub fn with_context(ctx: Context) -> Self {
        Self {
            ctx,
            occurrences: HashMap::new(),
            instances: HashMap::new(),
            worlds: HashMap::new(),
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Allocates an id from the graph's generator, e.g. for references.
    ///
    /// # Panics
    ///
    /// Panics when the id space is exhausted, see [`IdGenerator::next_id`].
    ///
    /// [`IdGenerator::next_id`]: crate::context::IdGenerator::next_id
    pub fn next_id(&mut self) -> u32 {
        self.ctx.ids.next_id()
    }

    // ------------------------------------------------------------------
    // Worlds and instances
    // ------------------------------------------------------------------

    pub fn create_world_handle(&mut self) -> WorldHandleId {
        let id = self.ctx.ids.next_id();
        self.worlds.insert(id, WorldHandle::new(id));
        id
    }

    pub fn world_handle(&self, id: WorldHandleId) -> Option<&WorldHandle> {
        self.worlds.get(&id)
    }

    pub fn world_handle_mut(&mut self, id: WorldHandleId) -> Option<&mut WorldHandle> {
        self.worlds.get_mut(&id)
    }

    /// Occurrences of `world` without a parent.
    pub fn root_occurrences(&self, world: WorldHandleId) -> Result<Vec<OccurrenceId>> {
        let handle = self
            .worlds
            .get(&world)
            .ok_or(SceneError::UnknownWorldHandle(world))?;
        Ok(handle
            .occurrences()
            .filter(|id| self.occurrences.get(id).is_some_and(StructOccurrence::is_orphan))
            .collect())
    }

    /// Places `reference` at `relative_matrix`.
    ///
    /// The instance has no occurrence yet; it is released together with the
    /// last occurrence that wraps it.
    pub fn create_instance(
        &mut self,
        name: impl Into<String>,
        reference: Rc<StructReference>,
        relative_matrix: Matrix4<f32>,
    ) -> InstanceId {
        let id = self.ctx.ids.next_id();
        self.instances.insert(
            id,
            StructInstance::new(id, name.into(), reference, relative_matrix),
        );
        id
    }

    pub fn instance(&self, id: InstanceId) -> Option<&StructInstance> {
        self.instances.get(&id)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Moves an instance and every occurrence of it, with their subtrees.
    pub fn set_relative_matrix(
        &mut self,
        instance: InstanceId,
        matrix: Matrix4<f32>,
    ) -> Result<()> {
        let inst = self
            .instances
            .get_mut(&instance)
            .ok_or(SceneError::UnknownInstance(instance))?;
        inst.set_relative_matrix(matrix);
        let occurrences = inst.occurrences().to_vec();
        for occurrence in occurrences {
            self.update_childs_absolute_matrix(occurrence)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Occurrence lookup
    // ------------------------------------------------------------------

    pub fn occurrence(&self, id: OccurrenceId) -> Option<&StructOccurrence> {
        self.occurrences.get(&id)
    }

    pub fn occurrence_count(&self) -> usize {
        self.occurrences.len()
    }

    /// Every live occurrence, attached or not, in no particular order.
    pub fn occurrences(&self) -> impl Iterator<Item = &StructOccurrence> {
        self.occurrences.values()
    }

    pub fn instances(&self) -> impl Iterator<Item = &StructInstance> {
        self.instances.values()
    }

    pub fn struct_instance(&self, id: OccurrenceId) -> Result<&StructInstance> {
        let node = self.node(id)?;
        self.instance_of(node)
    }

    pub fn struct_reference(&self, id: OccurrenceId) -> Result<&Rc<StructReference>> {
        Ok(self.struct_instance(id)?.struct_reference())
    }

    /// The collection holding the occurrence's drawable, if it is attached.
    pub fn occurrence_collection(&self, id: OccurrenceId) -> Result<Option<&Collection>> {
        Ok(self
            .node(id)?
            .world_handle
            .and_then(|world| self.worlds.get(&world))
            .map(WorldHandle::collection))
    }

    pub fn set_name(&mut self, id: OccurrenceId, name: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.name = name.into();
        Ok(())
    }

    /// All descendants of `id` in pre-order, `id` excluded.
    pub fn descendants(&self, id: OccurrenceId) -> Result<Vec<OccurrenceId>> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out)?;
        Ok(out)
    }

    fn collect_descendants(&self, id: OccurrenceId, out: &mut Vec<OccurrenceId>) -> Result<()> {
        for &child in &self.node(id)?.children {
            out.push(child);
            self.collect_descendants(child, out)?;
        }
        Ok(())
    }

    /// Attached occurrences of the subtree rooted at `id` that own a drawable.
    pub fn drawable_occurrences(&self, id: OccurrenceId) -> Result<Vec<OccurrenceId>> {
        let mut subtree = vec![id];
        subtree.extend(self.descendants(id)?);
        Ok(subtree
            .into_iter()
            .filter(|occ| {
                self.occurrences
                    .get(occ)
                    .is_some_and(|node| node.has_drawable && node.is_attached())
            })
            .collect())
    }

    // ------------------------------------------------------------------
    // Construction and destruction
    // ------------------------------------------------------------------

    /// Creates a root occurrence of `instance`, registered with `world`.
    ///
    /// If the instance is already placed, the children of its first
    /// occurrence are cloned under the new node so every occurrence of an
    /// instance has the same shape. `shader_id` files the drawable in a
    /// shading group of the collection.
    pub fn create_occurrence(
        &mut self,
        world: Option<WorldHandleId>,
        instance: InstanceId,
        shader_id: ShaderId,
    ) -> Result<OccurrenceId> {
        self.check_world(world)?;
        let inst = self
            .instances
            .get(&instance)
            .ok_or(SceneError::UnknownInstance(instance))?;
        let name = inst.name().to_string();
        let relative = inst.relative_matrix();
        let has_representation = inst.struct_reference().has_representation();
        let template = inst.first_occurrence();

        let id = self.ctx.ids.next_id();
        debug!("create occurrence {} of instance {} ({})", id, instance, name);
        self.occurrences.insert(
            id,
            StructOccurrence::new(id, name, instance, world, relative, has_representation),
        );

        if let Some(template) = template {
            let template_children = self.node(template)?.children.clone();
            for child in template_children {
                let clone = self.clone_occurrence(world, child)?;
                self.add_child(id, clone)?;
            }
        }

        self.register(id, false, shader_id);
        self.update_childs_absolute_matrix(id)?;
        self.instance_mut(instance)?.occurrence_created(id);
        Ok(id)
    }

    /// Deep-clones `source` into a new root occurrence registered with `world`.
    ///
    /// The clone shares the instance of the source. When both source and
    /// clone are attached, the source's shading group and selection state
    /// are carried over to the clone's drawable.
    pub fn clone_occurrence(
        &mut self,
        world: Option<WorldHandleId>,
        source: OccurrenceId,
    ) -> Result<OccurrenceId> {
        self.check_world(world)?;
        let src = self.node(source)?.clone();

        let mut shader_id = NO_SHADER;
        let mut selected = false;
        if src.has_drawable && world.is_some() {
            if let Some(collection) = src
                .world_handle
                .and_then(|src_world| self.worlds.get(&src_world))
                .map(WorldHandle::collection)
            {
                shader_id = collection.shading_group(source).unwrap_or(NO_SHADER);
                selected = collection
                    .instance_handle(source)
                    .is_some_and(Drawable::is_selected);
            }
        }

        let id = self.ctx.ids.next_id();
        debug!("clone occurrence {} into {}", source, id);
        self.occurrences.insert(
            id,
            StructOccurrence {
                id,
                name: src.name.clone(),
                instance: src.instance,
                parent: None,
                children: Vec::new(),
                world_handle: world,
                absolute_matrix: src.absolute_matrix,
                representation_decided: src.representation_decided,
                has_drawable: src.has_drawable,
            },
        );
        // as a root the absolute matrix is the relative one
        self.update_absolute_matrix(id)?;
        self.register(id, selected, shader_id);

        for child in &src.children {
            let clone = self.clone_occurrence(world, *child)?;
            // add_child recomputes the attached subtree after linking it
            self.add_child(id, clone)?;
        }

        self.instance_mut(src.instance)?.occurrence_created(id);
        Ok(id)
    }

    /// Destroys `id` and its whole subtree.
    ///
    /// Every destroyed occurrence leaves its world handle and its instance;
    /// instances left without occurrences are released.
    pub fn destroy_occurrence(&mut self, id: OccurrenceId) -> Result<()> {
        let node = self.node(id)?;
        debug_assert!(
            self.instances.contains_key(&node.instance),
            "occurrence {} outlived its instance {}",
            id,
            node.instance
        );
        if let Some(parent) = node.parent {
            if let Some(parent) = self.occurrences.get_mut(&parent) {
                parent.children.retain(|&child| child != id);
            }
        }
        self.destroy_subtree(id);
        Ok(())
    }

    fn destroy_subtree(&mut self, id: OccurrenceId) {
        self.unregister(id);
        let children = self
            .occurrences
            .get_mut(&id)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        for child in children {
            self.destroy_subtree(child);
        }
        let Some(node) = self.occurrences.remove(&id) else {
            return;
        };
        trace!("destroyed occurrence {}", id);
        let remaining = self
            .instances
            .get_mut(&node.instance)
            .map(|inst| inst.occurrence_deleted(id));
        if remaining == Some(0) {
            debug!("instance {} released with its last occurrence", node.instance);
            self.instances.remove(&node.instance);
        }
    }

    // ------------------------------------------------------------------
    // Aggregate queries
    // ------------------------------------------------------------------

    pub fn number_of_faces(&self, id: OccurrenceId) -> Result<usize> {
        let node = self.node(id)?;
        if node.has_representation() {
            return Ok(self.instance_of(node)?.struct_reference().number_of_faces());
        }
        let mut faces = 0;
        for &child in &node.children {
            faces += self.number_of_faces(child)?;
        }
        Ok(faces)
    }

    pub fn number_of_vertices(&self, id: OccurrenceId) -> Result<usize> {
        let node = self.node(id)?;
        if node.has_representation() {
            return Ok(self.instance_of(node)?.struct_reference().number_of_vertices());
        }
        let mut vertices = 0;
        for &child in &node.children {
            vertices += self.number_of_vertices(child)?;
        }
        Ok(vertices)
    }

    /// Number of distinct materials in the subtree.
    ///
    /// Materials shared between children count once, so this is the size of
    /// [`SceneGraph::material_set`], not a sum over children.
    pub fn number_of_materials(&self, id: OccurrenceId) -> Result<usize> {
        let node = self.node(id)?;
        if node.has_representation() {
            return Ok(self.instance_of(node)?.struct_reference().number_of_materials());
        }
        Ok(self.material_set(id)?.len())
    }

    pub fn material_set(&self, id: OccurrenceId) -> Result<MaterialSet> {
        let node = self.node(id)?;
        if node.has_representation() {
            return Ok(self.instance_of(node)?.struct_reference().material_set());
        }
        let mut materials = MaterialSet::new();
        for &child in &node.children {
            materials.extend(self.material_set(child)?);
        }
        Ok(materials)
    }

    /// World-space bounds of the occurrence.
    ///
    /// Empty for an orphan (no parent) and for an occurrence not attached to
    /// a world. Occurrences with a representation report their drawable's
    /// box, others the union of their children's boxes.
    pub fn bounding_box(&self, id: OccurrenceId) -> Result<BoundingBox> {
        let node = self.node(id)?;
        let world = match node.world_handle {
            Some(world) if !node.is_orphan() => world,
            _ => return Ok(BoundingBox::empty()),
        };
        if node.has_representation() {
            let collection = self.world(world)?.collection();
            debug_assert!(
                !node.has_drawable || collection.contains(id),
                "occurrence {} has no drawable in world {}",
                id,
                world
            );
            return Ok(collection
                .instance_handle(id)
                .map(Drawable::bounding_box)
                .unwrap_or_default());
        }
        let mut bounds = BoundingBox::empty();
        for &child in &node.children {
            bounds.combine(&self.bounding_box(child)?);
        }
        Ok(bounds)
    }

    /// True if the occurrence's drawable, or any descendant's, is visible.
    pub fn is_visible(&self, id: OccurrenceId) -> Result<bool> {
        let node = self.node(id)?;
        if node.has_representation() {
            return Ok(node
                .world_handle
                .and_then(|world| self.worlds.get(&world))
                .and_then(|world| world.collection().instance_handle(id))
                .is_some_and(Drawable::is_visible));
        }
        if node.has_child() {
            for &child in &node.children {
                if self.is_visible(child)? {
                    return Ok(true);
                }
            }
            return Ok(false);
        }
        log!(
            self.ctx.empty_leaf_level,
            "Leaf occurrence {} {} without representation",
            id,
            node.name
        );
        Ok(false)
    }

    /// Shows or hides the occurrence's drawable, or every drawable below it.
    pub fn set_visibility(&mut self, id: OccurrenceId, visible: bool) -> Result<()> {
        let node = self.node(id)?;
        if node.has_representation() {
            if let Some(drawable) = self.drawable_mut(id) {
                drawable.set_visibility(visible);
            }
            return Ok(());
        }
        let children = node.children.clone();
        for child in children {
            self.set_visibility(child, visible)?;
        }
        Ok(())
    }

    /// Flips the normals of the occurrence's own drawable.
    pub fn reverse_normals(&mut self, id: OccurrenceId) -> Result<()> {
        if self.node(id)?.has_drawable {
            if let Some(drawable) = self.drawable_mut(id) {
                drawable.reverse_normals();
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Transform propagation
    // ------------------------------------------------------------------

    /// Recomputes `parent.absolute * relative` (or `relative` for a root) and
    /// pushes it to the occurrence's drawable.
    pub fn update_absolute_matrix(&mut self, id: OccurrenceId) -> Result<()> {
        let node = self.node(id)?;
        let relative = self.instance_of(node)?.relative_matrix();
        let absolute = match node.parent {
            Some(parent) => self.node(parent)?.absolute_matrix * relative,
            None => relative,
        };
        let has_drawable = node.has_drawable;
        self.node_mut(id)?.absolute_matrix = absolute;
        if has_drawable {
            if let Some(drawable) = self.drawable_mut(id) {
                drawable.set_matrix(absolute);
            }
        }
        Ok(())
    }

    /// Updates `id`, then every descendant in pre-order.
    pub fn update_childs_absolute_matrix(&mut self, id: OccurrenceId) -> Result<()> {
        self.update_absolute_matrix(id)?;
        let children = self.node(id)?.children.clone();
        for child in children {
            self.update_childs_absolute_matrix(child)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    /// Appends the orphan `child` under `parent`.
    ///
    /// A child without world handle joins the parent's world with its whole
    /// subtree. Transforms of the child subtree are recomputed.
    pub fn add_child(&mut self, parent: OccurrenceId, child: OccurrenceId) -> Result<()> {
        let world = self.check_attachable(parent, child)?;
        let child_world = self.node(child)?.world_handle;

        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        if child_world.is_none() && world.is_some() {
            self.set_world_handle(child, world)?;
        }
        self.update_childs_absolute_matrix(child)
    }

    /// Adds an occurrence of `instance` under `parent` and returns it.
    ///
    /// An instance placed for the first time gets a fresh occurrence; an
    /// already placed one gets a clone of its first occurrence.
    pub fn add_child_instance(
        &mut self,
        parent: OccurrenceId,
        instance: InstanceId,
    ) -> Result<OccurrenceId> {
        let world = self.node(parent)?.world_handle;
        let first = self
            .instances
            .get(&instance)
            .ok_or(SceneError::UnknownInstance(instance))?
            .first_occurrence();
        let occurrence = match first {
            None => self.create_occurrence(world, instance, NO_SHADER)?,
            Some(first) => self.clone_occurrence(world, first)?,
        };
        self.add_child(parent, occurrence)?;
        Ok(occurrence)
    }

    /// Links many orphans under `parent` without registering them or
    /// recomputing transforms.
    ///
    /// Nothing is changed if any child fails the checks of
    /// [`SceneGraph::add_child`]. The returned marker must be passed to
    /// [`SceneGraph::commit_transforms`].
    pub fn attach_children(
        &mut self,
        parent: OccurrenceId,
        children: &[OccurrenceId],
    ) -> Result<PendingTransforms> {
        for (i, &child) in children.iter().enumerate() {
            if children[..i].contains(&child) {
                return Err(SceneError::DuplicateChild(child));
            }
            self.check_attachable(parent, child)?;
        }
        for &child in children {
            self.node_mut(parent)?.children.push(child);
            self.node_mut(child)?.parent = Some(parent);
        }
        trace!("attached {} children under {}, transforms pending", children.len(), parent);
        Ok(PendingTransforms {
            parent,
            children: children.to_vec(),
        })
    }

    /// Completes a bulk attach: joins the children to the parent's world and
    /// recomputes the parent's subtree.
    ///
    /// Children destroyed or re-parented since the attach are skipped.
    pub fn commit_transforms(&mut self, pending: PendingTransforms) -> Result<()> {
        let world = self.node(pending.parent)?.world_handle;
        if world.is_some() {
            for &child in &pending.children {
                let Some(node) = self.occurrences.get(&child) else {
                    debug!("pending child {} was destroyed before commit", child);
                    continue;
                };
                if node.parent != Some(pending.parent) {
                    debug!("pending child {} left {} before commit", child, pending.parent);
                    continue;
                }
                if node.world_handle.is_none() {
                    self.set_world_handle(child, world)?;
                }
            }
        }
        self.update_childs_absolute_matrix(pending.parent)
    }

    /// Detaches `id` from its parent.
    pub fn make_orphan(&mut self, id: OccurrenceId) -> Result<()> {
        let parent = self.node(id)?.parent.ok_or(SceneError::AlreadyOrphan(id))?;
        self.remove_child(parent, id)?;
        Ok(())
    }

    /// Unlinks `child` from `parent` and detaches its subtree from its world.
    ///
    /// Returns `false`, changing nothing, if `child` is not a child of
    /// `parent`.
    pub fn remove_child(&mut self, parent: OccurrenceId, child: OccurrenceId) -> Result<bool> {
        self.node(child)?;
        let Some(position) = self.node(parent)?.children.iter().position(|&c| c == child) else {
            return Ok(false);
        };
        self.node_mut(parent)?.children.remove(position);
        self.node_mut(child)?.parent = None;
        self.set_world_handle(child, None)?;
        self.update_childs_absolute_matrix(child)?;
        Ok(true)
    }

    /// Moves the subtree rooted at `id` to `world` (or detaches it).
    ///
    /// Drawables are re-created in the new world's collection; shading group
    /// and selection do not follow.
    pub fn set_world_handle(
        &mut self,
        id: OccurrenceId,
        world: Option<WorldHandleId>,
    ) -> Result<()> {
        self.check_world(world)?;
        let node = self.node(id)?;
        if node.world_handle == world {
            return Ok(());
        }
        let children = node.children.clone();
        self.unregister(id);
        self.node_mut(id)?.world_handle = world;
        self.register(id, false, NO_SHADER);
        for child in children {
            self.set_world_handle(child, world)?;
        }
        Ok(())
    }

    /// Materializes the reference's representation for `id`.
    ///
    /// Afterwards the occurrence counts as having a representation, whether
    /// or not the reference carries a template; only a template yields a
    /// drawable.
    pub fn check_for_representation(&mut self, id: OccurrenceId) -> Result<()> {
        let template = self.struct_reference(id)?.instance_representation();
        let node = self.node_mut(id)?;
        node.representation_decided = true;
        let Some(template) = template else {
            return Ok(());
        };
        if node.has_drawable {
            return Ok(());
        }
        node.has_drawable = true;
        let world = node.world_handle;
        let drawable = Drawable::new(id, node.name.clone(), template, node.absolute_matrix);
        // unattached occurrences get their drawable when registered
        if let Some(handle) = world.and_then(|world| self.worlds.get_mut(&world)) {
            handle.collection_mut().add(drawable, NO_SHADER);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn node(&self, id: OccurrenceId) -> Result<&StructOccurrence> {
        self.occurrences
            .get(&id)
            .ok_or(SceneError::UnknownOccurrence(id))
    }

    fn node_mut(&mut self, id: OccurrenceId) -> Result<&mut StructOccurrence> {
        self.occurrences
            .get_mut(&id)
            .ok_or(SceneError::UnknownOccurrence(id))
    }

    fn instance_of(&self, node: &StructOccurrence) -> Result<&StructInstance> {
        self.instances
            .get(&node.instance)
            .ok_or(SceneError::UnknownInstance(node.instance))
    }

    fn instance_mut(&mut self, id: InstanceId) -> Result<&mut StructInstance> {
        self.instances
            .get_mut(&id)
            .ok_or(SceneError::UnknownInstance(id))
    }

    fn world(&self, id: WorldHandleId) -> Result<&WorldHandle> {
        self.worlds.get(&id).ok_or(SceneError::UnknownWorldHandle(id))
    }

    fn check_world(&self, world: Option<WorldHandleId>) -> Result<()> {
        match world {
            Some(id) if !self.worlds.contains_key(&id) => Err(SceneError::UnknownWorldHandle(id)),
            _ => Ok(()),
        }
    }

    fn drawable_mut(&mut self, id: OccurrenceId) -> Option<&mut Drawable> {
        let world = self.occurrences.get(&id)?.world_handle?;
        self.worlds
            .get_mut(&world)?
            .collection_mut()
            .instance_handle_mut(id)
    }

    /// Checks that `child` may go under `parent` and returns the parent's world.
    fn check_attachable(
        &self,
        parent: OccurrenceId,
        child: OccurrenceId,
    ) -> Result<Option<WorldHandleId>> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;
        if !child_node.is_orphan() {
            return Err(SceneError::NotOrphan(child));
        }
        if child_node.world_handle.is_some()
            && child_node.world_handle != parent_node.world_handle
        {
            return Err(SceneError::WorldHandleMismatch {
                parent,
                parent_world: parent_node.world_handle,
                child,
                child_world: child_node.world_handle,
            });
        }
        // child is a root, so a cycle means parent lies in child's subtree
        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(SceneError::WouldCreateCycle { parent, child });
            }
            cursor = self.occurrences.get(&current).and_then(|node| node.parent);
        }
        Ok(parent_node.world_handle)
    }

    /// Registers `id` with its own world handle, creating its drawable.
    fn register(&mut self, id: OccurrenceId, selected: bool, shader_id: ShaderId) {
        let Some(node) = self.occurrences.get(&id) else {
            return;
        };
        let Some(world) = node.world_handle else {
            return;
        };
        let drawable = if node.has_drawable {
            self.instances
                .get(&node.instance)
                .and_then(|inst| inst.struct_reference().instance_representation())
                .map(|template| {
                    Drawable::new(id, node.name.clone(), template, node.absolute_matrix)
                })
        } else {
            None
        };
        if let Some(handle) = self.worlds.get_mut(&world) {
            handle.add_occurrence(id, drawable, selected, shader_id);
        }
    }

    fn unregister(&mut self, id: OccurrenceId) {
        let world = self.occurrences.get(&id).and_then(|node| node.world_handle);
        if let Some(handle) = world.and_then(|world| self.worlds.get_mut(&world)) {
            handle.remove_occurrence(id);
        }
    }
}
