//! This module is used for tests.
//!
//! [`CorridorWorld`] is a deterministic in-memory world: a one-dimensional
//! corridor where moving east advances toward the goal. It lets the episode
//! and session logic be exercised without any transport.
use crate::error::{StoreError, WorldError};
use crate::{BestScore, Direction, Location, Score, ScoreStore, State, World, WorldStep};

/// Deterministic corridor world of a fixed length.
///
/// The agent starts at `x = 0`. Moving east advances one cell for a step
/// penalty of -1.0 and reaching the last cell ends the episode with the goal
/// reward. Moving west walks back (also -1.0, floored at the start cell);
/// north and south bump into the corridor wall for -5.0. An optional fault
/// makes the n-th `step` call fail with a transport error.
pub struct CorridorWorld {
    world_id: i64,
    length: i64,
    goal_reward: f64,
    pos: i64,
    steps_taken: usize,
    fail_at_step: Option<usize>,
}

impl CorridorWorld {
    /// Creates a corridor of `length` cells in world `world_id`.
    pub fn new(world_id: i64, length: i64, goal_reward: f64) -> Self {
        Self {
            world_id,
            length,
            goal_reward,
            pos: 0,
            steps_taken: 0,
            fail_at_step: None,
        }
    }

    /// Makes the `n`-th step call (1-based) fail with a transport error.
    pub fn fail_at_step(mut self, n: usize) -> Self {
        self.fail_at_step = Some(n);
        self
    }

    /// Total number of step calls seen so far, across episodes.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    fn state(&self) -> State {
        State::new(self.world_id, self.pos, 0)
    }
}

impl World for CorridorWorld {
    fn locate(&mut self) -> Result<Location, WorldError> {
        Ok(Location {
            state: Some(self.state()),
            run_id: None,
        })
    }

    fn enter(&mut self, world_id: i64) -> Result<State, WorldError> {
        if world_id != self.world_id {
            return Err(WorldError::Unavailable(format!(
                "no such world: {}",
                world_id
            )));
        }
        self.pos = 0;
        Ok(self.state())
    }

    fn step(&mut self, dir: Direction) -> Result<WorldStep, WorldError> {
        self.steps_taken += 1;
        if Some(self.steps_taken) == self.fail_at_step {
            return Err(WorldError::Transport("injected fault".into()));
        }
        let (reward, done) = match dir {
            Direction::E => {
                self.pos += 1;
                if self.pos >= self.length - 1 {
                    self.pos = self.length - 1;
                    (self.goal_reward, true)
                } else {
                    (-1.0, false)
                }
            }
            Direction::W => {
                self.pos = (self.pos - 1).max(0);
                (-1.0, false)
            }
            Direction::N | Direction::S => (-5.0, false),
        };
        Ok(WorldStep {
            state: self.state(),
            reward,
            done,
        })
    }

    fn score(&mut self) -> Result<Score, WorldError> {
        Ok(Score {
            current: self.goal_reward,
            best: self.goal_reward,
        })
    }
}

/// In-memory score store, recording every save.
#[derive(Default)]
pub struct MemoryScoreStore {
    record: BestScore,
    /// Snapshots of every successful save, oldest first.
    pub saves: Vec<BestScore>,
}

impl MemoryScoreStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `record`.
    pub fn with_record(record: BestScore) -> Self {
        Self {
            record,
            saves: Vec::new(),
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&mut self) -> Result<BestScore, StoreError> {
        Ok(self.record.clone())
    }

    fn save(&mut self, best: &BestScore) -> Result<(), StoreError> {
        self.record = best.clone();
        self.saves.push(best.clone());
        Ok(())
    }
}

/// Score store whose operations always fail, for error-path tests.
pub struct FailingScoreStore;

impl ScoreStore for FailingScoreStore {
    fn load(&mut self) -> Result<BestScore, StoreError> {
        Err(StoreError::Format("broken store".into()))
    }

    fn save(&mut self, _best: &BestScore) -> Result<(), StoreError> {
        Err(StoreError::Format("broken store".into()))
    }
}
