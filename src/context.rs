//! Graph-wide context: id allocation and diagnostics settings.
//!
//! Every [`SceneGraph`](crate::data_structures::scene_graph::SceneGraph) owns
//! one `Context`. Ids are handed out by an explicit [`IdGenerator`] so tests
//! can run with a deterministic sequence.

use log::Level;

/// Monotonic id allocator.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u32,
}

impl IdGenerator {
    /// Starts at 1; 0 is reserved as "no id".
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u32) -> Self {
        Self { next: first.max(1) }
    }

    /// Hands out the next id.
    ///
    /// # Panics
    ///
    /// Panics once the `u32` id space is used up, i.e. when asked for id
    /// `u32::MAX`. Every `SceneGraph::create_*` call allocates through here.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self
            .next
            .checked_add(1)
            .unwrap_or_else(|| panic!("id space exhausted after {}", id));
        id
    }

    /// The id the next call to [`IdGenerator::next_id`] returns.
    pub fn peek(&self) -> u32 {
        self.next
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Context {
    pub ids: IdGenerator,
    /// Level at which childless occurrences without representation are reported.
    pub empty_leaf_level: Level,
}

impl Context {
    pub fn new() -> Self {
        Self {
            ids: IdGenerator::new(),
            empty_leaf_level: Level::Debug,
        }
    }

    pub fn with_first_id(first: u32) -> Self {
        Self {
            ids: IdGenerator::starting_at(first),
            ..Self::new()
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
