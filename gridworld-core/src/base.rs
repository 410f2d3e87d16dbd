//! Basic types and collaborator interfaces.
mod direction;
mod state;
mod step;
mod store;
mod world;

pub use direction::Direction;
pub use state::State;
pub use step::{Location, Score, WorldStep};
pub use store::{BestScore, ScoreStore};
pub use world::World;
