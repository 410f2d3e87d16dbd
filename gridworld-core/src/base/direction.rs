//! Moves on the grid.
use crate::error::WorldError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A move on the grid, one of the four cardinal directions.
///
/// The set is closed; the canonical order is N, S, E, W.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// North.
    N,
    /// South.
    S,
    /// East.
    E,
    /// West.
    W,
}

impl Direction {
    /// All directions in canonical order.
    pub const ALL: [Direction; 4] = [Direction::N, Direction::S, Direction::E, Direction::W];

    /// Index of this direction within [`Direction::ALL`].
    pub fn index(self) -> usize {
        match self {
            Direction::N => 0,
            Direction::S => 1,
            Direction::E => 2,
            Direction::W => 3,
        }
    }

    /// Name of the direction as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::S => "S",
            Direction::E => "E",
            Direction::W => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Direction::N),
            "S" => Ok(Direction::S),
            "E" => Ok(Direction::E),
            "W" => Ok(Direction::W),
            _ => Err(WorldError::MalformedResponse(format!(
                "unknown direction: {:?}",
                s
            ))),
        }
    }
}
