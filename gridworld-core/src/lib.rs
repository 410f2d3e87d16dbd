#![warn(missing_docs)]
//! Learning core of the gridworld client.
//!
//! The agent learns to navigate a remote grid world with tabular Q-learning.
//! This crate holds the algorithmic parts: the Q-value table, the
//! epsilon-greedy agent, the episode state machine and the training loop.
//! Everything that talks to the outside (HTTP transport, score files) sits
//! behind the [`World`] and [`ScoreStore`] traits and lives in the
//! `gridworld-client` crate.
pub mod error;

mod base;
pub use base::{BestScore, Direction, Location, Score, ScoreStore, State, World, WorldStep};

mod qtable;
pub use qtable::QTable;

mod agent;
pub use agent::{QAgent, QAgentConfig};

mod episode;
pub use episode::{EpisodeOutcome, EpisodePhase, EpisodeRunner};

mod session;
pub use session::{SessionConfig, TrainingReport, TrainingSession};

pub mod dummy;
