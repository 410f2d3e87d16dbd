#![warn(missing_docs)]
//! HTTP access to the grid-world API and local score persistence.
//!
//! [`GridWorldClient`] implements [`gridworld_core::World`] over the two
//! endpoints of the game server (world operations on one, score and run
//! listings on the other). [`JsonScoreStore`] implements
//! [`gridworld_core::ScoreStore`] over a single JSON file shaped like the
//! server's per-team score records.
//!
//! The learning core never sees this crate's types except through those two
//! traits, so everything wire-shaped stays here.
mod client;
mod config;
mod store;
mod wire;

pub use client::GridWorldClient;
pub use config::ClientConfig;
pub use store::JsonScoreStore;
