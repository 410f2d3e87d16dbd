//! The remote world as seen by the learning core.
use super::{Direction, Location, Score, State, WorldStep};
use crate::error::WorldError;

/// Interface to a grid world the agent interacts with.
///
/// Implementations own the transport. The core issues one blocking call per
/// step and waits for its result; retries and timeouts belong to the
/// implementation, never to the core.
pub trait World {
    /// Returns the agent's current location.
    fn locate(&mut self) -> Result<Location, WorldError>;

    /// Enters the given world and returns the initial state.
    fn enter(&mut self, world_id: i64) -> Result<State, WorldError>;

    /// Applies one move and returns the resulting transition.
    fn step(&mut self, dir: Direction) -> Result<WorldStep, WorldError>;

    /// Returns the current and best server-side scores.
    fn score(&mut self) -> Result<Score, WorldError>;
}
