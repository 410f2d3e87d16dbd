//! Position of the agent as reported by the world.
use serde::{Deserialize, Serialize};

/// Where the agent is: a world and a cell within it.
///
/// The learning core treats this as an opaque key; only equality and
/// hashing matter for Q-table lookups. Instances are produced by the
/// world, never fabricated by the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    /// World the agent is in.
    pub world_id: i64,
    /// Horizontal grid coordinate.
    pub x: i64,
    /// Vertical grid coordinate.
    pub y: i64,
}

impl State {
    /// Constructs a state from a world id and grid coordinates.
    pub fn new(world_id: i64, x: i64, y: i64) -> Self {
        Self { world_id, x, y }
    }
}
