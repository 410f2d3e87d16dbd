//! Durable best-score records.
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Best rewards seen so far, per world, with a running total.
///
/// A recorded value is only ever replaced by a strictly greater one, so the
/// record is monotonically non-decreasing for each world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestScore {
    /// Sum of the per-world bests.
    pub total: f64,
    /// Best reward per world id.
    pub by_world: HashMap<String, f64>,
}

impl BestScore {
    /// Records `reward` for `world_id` if it strictly exceeds the stored
    /// value. Returns whether the record changed.
    pub fn record(&mut self, world_id: i64, reward: f64) -> bool {
        let key = world_id.to_string();
        let improved = match self.by_world.get(&key) {
            Some(prev) => reward > *prev,
            None => true,
        };
        if improved {
            self.by_world.insert(key, reward);
            self.total = self.by_world.values().sum();
        }
        improved
    }

    /// Best recorded reward for `world_id`, if any.
    pub fn for_world(&self, world_id: i64) -> Option<f64> {
        self.by_world.get(&world_id.to_string()).copied()
    }
}

/// Durable storage for [`BestScore`] records.
pub trait ScoreStore {
    /// Loads the stored record, or the default when none exists yet.
    fn load(&mut self) -> Result<BestScore, StoreError>;

    /// Persists the record.
    fn save(&mut self, best: &BestScore) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::BestScore;

    #[test]
    fn lower_reward_never_overwrites() {
        let mut best = BestScore::default();
        assert!(best.record(7, 12.0));
        assert!(!best.record(7, 5.0));
        assert_eq!(best.for_world(7), Some(12.0));
        assert_eq!(best.total, 12.0);
    }

    #[test]
    fn total_sums_over_worlds() {
        let mut best = BestScore::default();
        best.record(1, 3.0);
        best.record(2, 4.0);
        assert_eq!(best.total, 7.0);
        best.record(1, 6.0);
        assert_eq!(best.total, 10.0);
    }
}
