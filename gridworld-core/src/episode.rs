//! Drives one episode against the world.
use crate::error::WorldError;
use crate::{QAgent, State, World};
use log::trace;

/// Phase of an [`EpisodeRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    /// The episode has not begun.
    NotStarted,
    /// The step loop is in progress.
    Running,
    /// The episode finished normally.
    Done,
    /// A world call failed mid-episode.
    Failed,
}

/// How an episode ended.
#[derive(Debug)]
pub enum EpisodeOutcome {
    /// The world reported a terminal step, or the step guard tripped.
    Completed {
        /// Reward accumulated over the episode.
        total_reward: f64,
        /// Number of steps taken.
        steps: usize,
    },
    /// A world call failed; the accumulated reward is discarded, while
    /// Q-updates applied before the failure are kept.
    Failed {
        /// Number of steps completed before the failure.
        steps: usize,
        /// The failure.
        error: WorldError,
    },
}

/// Runs a single episode to completion.
///
/// The runner alternates agent decisions with world calls: re-enter the
/// world, then repeat choose / step / update until the world reports a
/// terminal step or the step guard trips.
pub struct EpisodeRunner {
    world_id: i64,
    max_steps: usize,
    phase: EpisodePhase,
}

impl EpisodeRunner {
    /// Creates a runner for `world_id`, giving up after `max_steps` steps.
    ///
    /// The guard protects against worlds that never report a terminal step.
    pub fn new(world_id: i64, max_steps: usize) -> Self {
        Self {
            world_id,
            max_steps,
            phase: EpisodePhase::NotStarted,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    /// Drives the episode.
    ///
    /// Each completed step applies its Q-update immediately, so updates from
    /// steps before a failure survive the failure.
    pub fn run<W: World>(&mut self, agent: &mut QAgent, world: &mut W) -> EpisodeOutcome {
        let mut state = match self.reset(world) {
            Ok(state) => state,
            Err(error) => {
                self.phase = EpisodePhase::Failed;
                return EpisodeOutcome::Failed { steps: 0, error };
            }
        };
        self.phase = EpisodePhase::Running;

        let mut total_reward = 0.0;
        let mut steps = 0;
        while steps < self.max_steps {
            let dir = agent.choose(&state);
            let step = match world.step(dir) {
                Ok(step) => step,
                Err(error) => {
                    self.phase = EpisodePhase::Failed;
                    return EpisodeOutcome::Failed { steps, error };
                }
            };
            agent.update(&state, dir, step.reward, &step.state, step.done);
            total_reward += step.reward;
            steps += 1;
            trace!("step {}: {} -> reward {:.2}", steps, dir, step.reward);
            if step.done {
                break;
            }
            state = step.state;
        }

        self.phase = EpisodePhase::Done;
        EpisodeOutcome::Completed {
            total_reward,
            steps,
        }
    }

    /// Re-enters the world and returns the initial state.
    ///
    /// The location call is authoritative for the spawn position; the enter
    /// response is the fallback when the server omits it.
    fn reset<W: World>(&mut self, world: &mut W) -> Result<State, WorldError> {
        let entered = world.enter(self.world_id)?;
        let location = world.locate()?;
        Ok(location.state.unwrap_or(entered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::CorridorWorld;
    use crate::{Direction, QAgent, QAgentConfig, State};

    fn greedy_agent(alpha: f64) -> QAgent {
        QAgent::build(QAgentConfig::default().alpha(alpha).epsilon(0.0).seed(42))
    }

    #[test]
    fn one_step_episode_applies_terminal_update() {
        // Corridor of length 2: the first eastward move reaches the goal.
        let mut world = CorridorWorld::new(1, 2, 10.0);
        let mut agent = greedy_agent(0.5);
        // Make east the greedy choice from the start cell.
        agent.update(&State::new(1, 0, 0), Direction::E, 1.0, &State::new(1, 1, 0), true);
        let seeded = agent.q_table().value(&State::new(1, 0, 0), Direction::E);

        let mut runner = EpisodeRunner::new(1, 100);
        assert_eq!(runner.phase(), EpisodePhase::NotStarted);
        let outcome = runner.run(&mut agent, &mut world);

        assert_eq!(runner.phase(), EpisodePhase::Done);
        match outcome {
            EpisodeOutcome::Completed {
                total_reward,
                steps,
            } => {
                assert_eq!(steps, 1);
                assert!((total_reward - 10.0).abs() < 1e-12);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        // q <- q + 0.5 * (10 - q) applied on top of the seeded value.
        let expected = seeded + 0.5 * (10.0 - seeded);
        let got = agent.q_table().value(&State::new(1, 0, 0), Direction::E);
        assert!((got - expected).abs() < 1e-12);
    }

    #[test]
    fn fresh_terminal_update_reaches_half_reward() {
        // Corridor of length 2: the goal move is the first time east is
        // tried, so its estimate lands at alpha * reward = 5.0.
        let mut world = CorridorWorld::new(1, 2, 10.0);
        let mut agent = greedy_agent(0.5);
        let mut runner = EpisodeRunner::new(1, 100);
        let outcome = runner.run(&mut agent, &mut world);
        assert!(matches!(outcome, EpisodeOutcome::Completed { .. }));
        let got = agent.q_table().value(&State::new(1, 0, 0), Direction::E);
        assert!((got - 5.0).abs() < 1e-12);
    }

    #[test]
    fn transport_failure_leaves_runner_failed_and_updates_kept() {
        let mut world = CorridorWorld::new(1, 10, 10.0).fail_at_step(3);
        let mut agent = greedy_agent(0.5);
        let mut runner = EpisodeRunner::new(1, 100);
        let outcome = runner.run(&mut agent, &mut world);

        assert_eq!(runner.phase(), EpisodePhase::Failed);
        match outcome {
            EpisodeOutcome::Failed { steps, error } => {
                assert_eq!(steps, 2);
                assert!(matches!(error, WorldError::Transport(_)));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        // Updates from the two completed steps are present.
        assert!(!agent.q_table().is_empty());
    }

    #[test]
    fn step_guard_truncates_endless_worlds() {
        // Greedy ties resolve to N, which bumps forever in the corridor.
        let mut world = CorridorWorld::new(1, 100, 10.0);
        let mut agent = greedy_agent(0.1);
        let mut runner = EpisodeRunner::new(1, 25);
        let outcome = runner.run(&mut agent, &mut world);

        assert_eq!(runner.phase(), EpisodePhase::Done);
        match outcome {
            EpisodeOutcome::Completed { steps, .. } => assert_eq!(steps, 25),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn entering_a_missing_world_fails_before_any_step() {
        let mut world = CorridorWorld::new(1, 10, 10.0);
        let mut agent = greedy_agent(0.1);
        let mut runner = EpisodeRunner::new(2, 100);
        let outcome = runner.run(&mut agent, &mut world);

        assert_eq!(runner.phase(), EpisodePhase::Failed);
        match outcome {
            EpisodeOutcome::Failed { steps, error } => {
                assert_eq!(steps, 0);
                assert!(error.is_fatal());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
