//! Values produced by interactions with the world.
use super::State;

/// Result of a single move in the world.
///
/// A blocked move (e.g. hitting a wall) is a valid step, usually carrying a
/// penalty reward; whether it also sets `done` is decided by the world
/// implementation, not by the learning core.
#[derive(Debug, Clone)]
pub struct WorldStep {
    /// State after the move.
    pub state: State,
    /// Reward received for the move.
    pub reward: f64,
    /// Whether the episode ended with this move.
    pub done: bool,
}

/// Current location of the agent as reported by the world.
#[derive(Debug, Clone)]
pub struct Location {
    /// The state the agent occupies, or `None` when it is in no world.
    pub state: Option<State>,
    /// Identifier of the active run, when the server reports one.
    pub run_id: Option<String>,
}

impl Location {
    /// Whether a run is currently active.
    pub fn active_run(&self) -> bool {
        self.state.is_some()
    }
}

/// Server-side score pair.
#[derive(Debug, Clone, Copy)]
pub struct Score {
    /// Score of the current run.
    pub current: f64,
    /// Best score recorded by the server.
    pub best: f64,
}
