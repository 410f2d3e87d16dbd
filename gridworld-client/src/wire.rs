//! Request and response shapes of the game server.
//!
//! The server is loose with scalar types (numbers arrive as JSON numbers or
//! as quoted strings depending on the endpoint), so every scalar field is
//! parsed through a tolerant helper before it reaches a core type.
use gridworld_core::error::WorldError;
use gridworld_core::{Location, Score, State, WorldStep};
use serde::{Deserialize, Serialize};

/// A JSON scalar that may arrive as a number or as a quoted string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub(crate) fn as_i64(&self) -> Result<i64, WorldError> {
        match self {
            Scalar::Int(v) => Ok(*v),
            Scalar::Float(v) => Ok(*v as i64),
            Scalar::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| WorldError::MalformedResponse(format!("not an integer: {:?}", s))),
        }
    }

    pub(crate) fn as_f64(&self) -> Result<f64, WorldError> {
        match self {
            Scalar::Int(v) => Ok(*v as f64),
            Scalar::Float(v) => Ok(*v),
            Scalar::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| WorldError::MalformedResponse(format!("not a number: {:?}", s))),
        }
    }

    fn as_string(&self) -> String {
        match self {
            Scalar::Int(v) => v.to_string(),
            Scalar::Float(v) => v.to_string(),
            Scalar::Str(s) => s.clone(),
        }
    }
}

fn position_to_xy(position: &[Scalar]) -> Result<(i64, i64), WorldError> {
    if position.len() != 2 {
        return Err(WorldError::MalformedResponse(format!(
            "position has {} coordinates",
            position.len()
        )));
    }
    Ok((position[0].as_i64()?, position[1].as_i64()?))
}

#[derive(Debug, Serialize)]
pub(crate) struct LocationParams {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "teamId")]
    pub team_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnterParams {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "teamId")]
    pub team_id: String,
    #[serde(rename = "worldId")]
    pub world_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct MoveParams {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "teamId")]
    pub team_id: String,
    #[serde(rename = "worldId")]
    pub world_id: String,
    #[serde(rename = "move")]
    pub direction: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreParams {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "teamId")]
    pub team_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RunsParams {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "teamId")]
    pub team_id: String,
    pub count: usize,
}

/// Common envelope fields of every response.
#[derive(Debug, Deserialize)]
pub(crate) struct LocationResponse {
    pub code: Option<String>,
    #[serde(rename = "worldId")]
    pub world_id: Option<Scalar>,
    #[serde(rename = "runId")]
    pub run_id: Option<Scalar>,
    pub position: Option<Vec<Scalar>>,
    pub message: Option<String>,
}

impl LocationResponse {
    /// Converts into a core [`Location`].
    ///
    /// A world id of `-1` means the team is not in any world; the position
    /// is then irrelevant and the state is absent.
    pub(crate) fn into_location(self) -> Result<Location, WorldError> {
        let run_id = self.run_id.as_ref().map(Scalar::as_string);
        let world_id = match &self.world_id {
            Some(v) => v.as_i64()?,
            None => {
                return Err(WorldError::MalformedResponse(
                    "location without worldId".into(),
                ))
            }
        };
        if world_id == -1 {
            return Ok(Location {
                state: None,
                run_id,
            });
        }
        let position = self.position.as_deref().ok_or_else(|| {
            WorldError::MalformedResponse("location in a world without position".into())
        })?;
        let (x, y) = position_to_xy(position)?;
        Ok(Location {
            state: Some(State::new(world_id, x, y)),
            run_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnterResponse {
    pub code: Option<String>,
    #[serde(rename = "worldId")]
    pub world_id: Option<Scalar>,
    pub position: Option<Vec<Scalar>>,
    pub message: Option<String>,
}

impl EnterResponse {
    /// Converts into the spawn [`State`] of `world_id`.
    ///
    /// The server often omits the spawn cell from the enter response; the
    /// origin stands in, and the follow-up location query is authoritative.
    pub(crate) fn into_state(self, world_id: i64) -> Result<State, WorldError> {
        let world_id = match &self.world_id {
            Some(v) => v.as_i64()?,
            None => world_id,
        };
        let (x, y) = match self.position.as_deref() {
            Some(position) => position_to_xy(position)?,
            None => (0, 0),
        };
        Ok(State::new(world_id, x, y))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoveResponse {
    pub code: Option<String>,
    #[serde(rename = "worldId")]
    pub world_id: Option<Scalar>,
    pub reward: Option<Scalar>,
    pub completed: Option<bool>,
    pub position: Option<Vec<Scalar>>,
    pub message: Option<String>,
}

impl MoveResponse {
    /// Converts into a core [`WorldStep`] for a move made in `world_id`.
    pub(crate) fn into_step(self, world_id: i64) -> Result<WorldStep, WorldError> {
        let world_id = match &self.world_id {
            Some(v) => v.as_i64()?,
            None => world_id,
        };
        let position = self
            .position
            .as_deref()
            .ok_or_else(|| WorldError::MalformedResponse("move without position".into()))?;
        let (x, y) = position_to_xy(position)?;
        let reward = match &self.reward {
            Some(v) => v.as_f64()?,
            None => 0.0,
        };
        Ok(WorldStep {
            state: State::new(world_id, x, y),
            reward,
            done: self.completed.unwrap_or(false),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreResponse {
    pub code: Option<String>,
    pub score: Option<Scalar>,
    #[serde(rename = "bestScore")]
    pub best_score: Option<Scalar>,
    pub message: Option<String>,
}

impl ScoreResponse {
    /// Converts into a core [`Score`], with the best falling back to the
    /// current value when the server omits it.
    pub(crate) fn into_score(self) -> Result<Score, WorldError> {
        let current = match &self.score {
            Some(v) => v.as_f64()?,
            None => return Err(WorldError::MalformedResponse("score without value".into())),
        };
        let best = match &self.best_score {
            Some(v) => v.as_f64()?,
            None => current,
        };
        Ok(Score { current, best })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunsResponse {
    pub code: Option<String>,
    #[serde(default)]
    pub runs: Vec<serde_json::Value>,
    pub message: Option<String>,
}
