//! Scene data structures: references, instances, occurrences and the graph.
//!
//! This module contains the core data types for assembly representation:
//!
//! - `bounding_box` is the axis-aligned box value type used by all bounds queries
//! - `material` holds shared materials and deduplicated material sets
//! - `representation` is the drawable template a reference may carry
//! - `reference` is the shared shape description
//! - `instance` places a reference with a relative matrix
//! - `occurrence` is a node of the assembly tree
//! - `drawable` is a materialized representation living in a collection
//! - `scene_graph` owns all of the above and keeps them consistent

pub mod bounding_box;
pub mod drawable;
pub mod instance;
pub mod material;
pub mod occurrence;
pub mod reference;
pub mod representation;
pub mod scene_graph;
