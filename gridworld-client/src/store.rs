//! File-backed best-score records.
use gridworld_core::error::StoreError;
use gridworld_core::{BestScore, ScoreStore};
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Best-score records in a single JSON file, keyed by team.
///
/// The file maps team ids to their records, so several teams can share one
/// file. A missing file reads as an empty record and is created on the first
/// save. Saving merges per world: a stored reward is only replaced by a
/// strictly greater one, whatever the caller passes in.
pub struct JsonScoreStore {
    path: PathBuf,
    team_id: String,
}

impl JsonScoreStore {
    /// Creates a store over `path` for `team_id`.
    pub fn new(path: impl Into<PathBuf>, team_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            team_id: team_id.into(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, BestScore>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&contents).map_err(|e| StoreError::Format(e.to_string()))
    }

    fn write_all(&self, data: &HashMap<String, BestScore>) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(data).map_err(|e| StoreError::Format(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&mut self) -> Result<BestScore, StoreError> {
        let data = self.read_all()?;
        Ok(data.get(&self.team_id).cloned().unwrap_or_default())
    }

    fn save(&mut self, best: &BestScore) -> Result<(), StoreError> {
        let mut data = self.read_all()?;
        let record = data.entry(self.team_id.clone()).or_default();
        for (world, reward) in &best.by_world {
            let improved = record.by_world.get(world).map_or(true, |prev| reward > prev);
            if improved {
                record.by_world.insert(world.clone(), *reward);
            }
        }
        record.total = record.by_world.values().sum();
        self.write_all(&data)
    }
}
