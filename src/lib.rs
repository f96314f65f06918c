//! assembly-ngin
//!
//! An occurrence/instance scene graph for CAD-style assemblies. One shape
//! description (a reference) can be placed many times (instances), and each
//! placement can appear at many spots of the assembly tree (occurrences).
//! Occurrences with a representation put a drawable into the collection of
//! the world they belong to, which an external renderer reads back.
//!
//! High-level modules
//! - `context`: id generation and diagnostics settings of a graph
//! - `data_structures`: references, instances, occurrences and the graph
//! - `collection`: the drawables of a world, with shading groups and selection
//! - `world_handle`: binding between a set of occurrences and a collection
//! - `render`: batching of a collection's drawables for a renderer
//! - `error`: error type of the tree operations
//!

pub mod collection;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod render;
pub mod world_handle;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use collection::{Collection, NO_SHADER, ShaderId};
pub use context::{Context, IdGenerator};
pub use data_structures::{
    bounding_box::BoundingBox,
    drawable::{Drawable, DrawableRaw},
    instance::{InstanceId, StructInstance, placement_matrix},
    material::{Material, MaterialId, MaterialSet},
    occurrence::{OccurrenceId, StructOccurrence},
    reference::{ReferenceId, StructReference},
    representation::Representation,
    scene_graph::{PendingTransforms, SceneGraph},
};
pub use error::{Result, SceneError};
pub use world_handle::{WorldHandle, WorldHandleId};
