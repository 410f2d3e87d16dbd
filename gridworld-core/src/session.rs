//! Multi-episode training sessions.
use crate::error::WorldError;
use crate::{EpisodeOutcome, EpisodeRunner, QAgent, QAgentConfig, ScoreStore, World};
use anyhow::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`TrainingSession`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SessionConfig {
    /// World the session trains in.
    pub world_id: i64,

    /// Number of episodes to run.
    pub episodes: usize,

    /// Step guard handed to each episode.
    pub max_steps_per_episode: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            world_id: 0,
            episodes: 100,
            max_steps_per_episode: 1000,
        }
    }
}

impl SessionConfig {
    /// Sets the world id.
    pub fn world_id(mut self, v: i64) -> Self {
        self.world_id = v;
        self
    }

    /// Sets the number of episodes.
    pub fn episodes(mut self, v: usize) -> Self {
        self.episodes = v;
        self
    }

    /// Sets the per-episode step guard.
    pub fn max_steps_per_episode(mut self, v: usize) -> Self {
        self.max_steps_per_episode = v;
        self
    }

    /// Constructs [`SessionConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SessionConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Summary of a finished training session.
#[derive(Debug, Serialize)]
pub struct TrainingReport {
    /// Best episode reward observed, if any episode completed.
    pub best_reward: Option<f64>,

    /// Score reported by the world after training, if the call succeeded.
    pub final_server_score: Option<f64>,

    /// Episodes that ran to completion.
    pub episodes_completed: usize,

    /// Episodes abandoned after a non-fatal failure.
    pub episodes_failed: usize,

    /// Whether the best-score record was written back to the store.
    pub persisted: bool,

    /// Human-readable descriptions of non-fatal failures, oldest first.
    pub failures: Vec<String>,
}

/// Runs episodes against a world, tracks the best reward, and persists it.
///
/// The session owns its agent. Episodes run one at a time; a non-fatal
/// episode failure is recorded and the next episode starts with the agent's
/// learning intact. A fatal world error aborts the session immediately.
pub struct TrainingSession {
    config: SessionConfig,
    agent: QAgent,
    completed: usize,
    failed: usize,
    best_reward: Option<f64>,
    failures: Vec<String>,
}

impl TrainingSession {
    /// Builds a session from session and agent configurations.
    pub fn build(config: SessionConfig, agent_config: QAgentConfig) -> Self {
        Self {
            config,
            agent: QAgent::build(agent_config),
            completed: 0,
            failed: 0,
            best_reward: None,
            failures: Vec::new(),
        }
    }

    /// The session's agent.
    pub fn agent(&self) -> &QAgent {
        &self.agent
    }

    /// Best episode reward observed so far.
    pub fn best_reward(&self) -> Option<f64> {
        self.best_reward
    }

    /// Runs a single episode and folds its outcome into the session.
    ///
    /// Epsilon decays only after a completed episode. A non-fatal failure is
    /// recorded and returned as `Ok`; a fatal one is returned as `Err` and
    /// the session should not continue.
    pub fn train_episode<W: World>(&mut self, world: &mut W) -> Result<EpisodeOutcome, WorldError> {
        let mut runner = EpisodeRunner::new(self.config.world_id, self.config.max_steps_per_episode);
        let outcome = runner.run(&mut self.agent, world);
        match &outcome {
            EpisodeOutcome::Completed {
                total_reward,
                steps,
            } => {
                self.completed += 1;
                if self.best_reward.map_or(true, |best| *total_reward > best) {
                    self.best_reward = Some(*total_reward);
                }
                self.agent.decay_epsilon();
                info!(
                    "episode {}: reward {:.2} in {} steps, epsilon {:.3}",
                    self.completed,
                    total_reward,
                    steps,
                    self.agent.epsilon()
                );
            }
            EpisodeOutcome::Failed { steps, error } => {
                if error.is_fatal() {
                    return Err(error.clone());
                }
                self.failed += 1;
                self.failures
                    .push(format!("episode failed after {} steps: {}", steps, error));
                warn!("episode failed after {} steps: {}", steps, error);
            }
        }
        Ok(outcome)
    }

    /// Runs the configured number of episodes, then persists and reports.
    ///
    /// Store and score failures during the final bookkeeping are surfaced in
    /// the report rather than aborting it.
    pub fn train<W, S>(&mut self, world: &mut W, store: &mut S) -> Result<TrainingReport>
    where
        W: World,
        S: ScoreStore,
    {
        for _ in 0..self.config.episodes {
            self.train_episode(world)?;
        }
        Ok(self.finish(world, store))
    }

    /// Persists the best reward and assembles the report.
    fn finish<W, S>(&mut self, world: &mut W, store: &mut S) -> TrainingReport
    where
        W: World,
        S: ScoreStore,
    {
        let mut persisted = false;
        if let Some(best) = self.best_reward {
            match store.load() {
                Ok(mut record) => {
                    if record.record(self.config.world_id, best) {
                        match store.save(&record) {
                            Ok(()) => persisted = true,
                            Err(e) => self.failures.push(format!("score save failed: {}", e)),
                        }
                    }
                }
                Err(e) => self.failures.push(format!("score load failed: {}", e)),
            }
        }

        let final_server_score = match world.score() {
            Ok(score) => Some(score.current),
            Err(e) => {
                self.failures.push(format!("score query failed: {}", e));
                None
            }
        };

        TrainingReport {
            best_reward: self.best_reward,
            final_server_score,
            episodes_completed: self.completed,
            episodes_failed: self.failed,
            persisted,
            failures: std::mem::take(&mut self.failures),
        }
    }
}
