//! Blocking HTTP implementation of the world interface.
use crate::config::ClientConfig;
use crate::wire::{
    EnterParams, EnterResponse, LocationParams, LocationResponse, MoveParams, MoveResponse,
    RunsParams, RunsResponse, ScoreParams, ScoreResponse,
};
use gridworld_core::error::WorldError;
use gridworld_core::{Direction, Location, Score, State, World, WorldStep};
use log::{trace, warn};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::{thread, time::Duration};

const USER_HEADER: &str = "X-User-ID";
const KEY_HEADER: &str = "X-API-Key";

/// Provides access to the grid-world game server.
///
/// World operations (location, enter, move) go to the gw endpoint as GET
/// queries or JSON POSTs; score and run listings go to the index endpoint as
/// form POSTs. Credentials travel as headers on every request.
pub struct GridWorldClient {
    client: Client,
    config: ClientConfig,

    /// World entered by the last successful `enter`, if any.
    world_id: Option<i64>,

    /// Position after the last successful world call, for block detection.
    last_state: Option<State>,
}

impl GridWorldClient {
    /// Creates a client from the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            world_id: None,
            last_state: None,
        }
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The most recent runs of the team, newest last.
    pub fn last_runs(&mut self, count: usize) -> Result<Vec<serde_json::Value>, WorldError> {
        let body = self.send_form(
            &self.config.index_endpoint,
            &RunsParams {
                kind: "runs",
                team_id: self.config.team_id.clone(),
                count,
            },
        )?;
        let resp: RunsResponse = parse(&body)?;
        if let Some(text) = failure_text(&resp.code, &resp.message) {
            return Err(WorldError::Api(text));
        }
        Ok(resp.runs)
    }

    fn send_get<Q: Serialize>(&self, url: &str, query: &Q) -> Result<String, WorldError> {
        self.with_retry(|| {
            self.client
                .get(url)
                .header(USER_HEADER, &self.config.user_id)
                .header(KEY_HEADER, &self.config.api_key)
                .query(query)
                .send()
        })
    }

    fn send_json<P: Serialize>(&self, url: &str, params: &P) -> Result<String, WorldError> {
        self.with_retry(|| {
            self.client
                .post(url)
                .header(USER_HEADER, &self.config.user_id)
                .header(KEY_HEADER, &self.config.api_key)
                .json(params)
                .send()
        })
    }

    fn send_form<P: Serialize>(&self, url: &str, params: &P) -> Result<String, WorldError> {
        self.with_retry(|| {
            self.client
                .post(url)
                .header(USER_HEADER, &self.config.user_id)
                .header(KEY_HEADER, &self.config.api_key)
                .form(params)
                .send()
        })
    }

    /// Sends a request, retrying transport-level failures with a fixed
    /// backoff. HTTP error statuses and malformed bodies are not retried.
    fn with_retry(
        &self,
        send: impl Fn() -> reqwest::Result<reqwest::blocking::Response>,
    ) -> Result<String, WorldError> {
        let mut attempt = 0;
        loop {
            match send() {
                Ok(resp) => {
                    let status = resp.status();
                    if !status.is_success() {
                        return Err(WorldError::Api(format!("HTTP status {}", status)));
                    }
                    let body = resp
                        .text()
                        .map_err(|e| WorldError::Transport(e.to_string()))?;
                    trace!("response body: {}", body);
                    return Ok(body);
                }
                Err(e) if attempt < self.config.retries => {
                    attempt += 1;
                    warn!(
                        "transport failure, retry {}/{}: {}",
                        attempt, self.config.retries, e
                    );
                    thread::sleep(Duration::from_millis(self.config.backoff_ms));
                }
                Err(e) => return Err(WorldError::Transport(e.to_string())),
            }
        }
    }
}

impl World for GridWorldClient {
    fn locate(&mut self) -> Result<Location, WorldError> {
        let body = self.send_get(
            &self.config.gw_endpoint,
            &LocationParams {
                kind: "location",
                team_id: self.config.team_id.clone(),
            },
        )?;
        let resp: LocationResponse = parse(&body)?;
        if let Some(text) = failure_text(&resp.code, &resp.message) {
            return Err(WorldError::Api(text));
        }
        let location = resp.into_location()?;
        if let Some(state) = &location.state {
            self.last_state = Some(state.clone());
        }
        Ok(location)
    }

    fn enter(&mut self, world_id: i64) -> Result<State, WorldError> {
        let body = self.send_json(
            &self.config.gw_endpoint,
            &EnterParams {
                kind: "enter",
                team_id: self.config.team_id.clone(),
                world_id: world_id.to_string(),
            },
        )?;
        let resp: EnterResponse = parse(&body)?;
        if let Some(text) = failure_text(&resp.code, &resp.message) {
            return Err(WorldError::Unavailable(text));
        }
        let state = resp.into_state(world_id)?;
        self.world_id = Some(world_id);
        self.last_state = Some(state.clone());
        Ok(state)
    }

    fn step(&mut self, dir: Direction) -> Result<WorldStep, WorldError> {
        let world_id = self
            .world_id
            .ok_or_else(|| WorldError::Api("no world entered".into()))?;
        let body = self.send_json(
            &self.config.gw_endpoint,
            &MoveParams {
                kind: "move",
                team_id: self.config.team_id.clone(),
                world_id: world_id.to_string(),
                direction: dir.to_string(),
            },
        )?;
        let resp: MoveResponse = parse(&body)?;
        if let Some(text) = failure_text(&resp.code, &resp.message) {
            return Err(WorldError::Api(text));
        }
        let mut step = resp.into_step(world_id)?;
        if self.config.block_is_terminal
            && !step.done
            && self.last_state.as_ref() == Some(&step.state)
        {
            step.done = true;
        }
        if step.done {
            self.world_id = None;
            self.last_state = None;
        } else {
            self.last_state = Some(step.state.clone());
        }
        Ok(step)
    }

    fn score(&mut self) -> Result<Score, WorldError> {
        let body = self.send_form(
            &self.config.index_endpoint,
            &ScoreParams {
                kind: "score",
                team_id: self.config.team_id.clone(),
            },
        )?;
        let resp: ScoreResponse = parse(&body)?;
        if let Some(text) = failure_text(&resp.code, &resp.message) {
            return Err(WorldError::Api(text));
        }
        resp.into_score()
    }
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, WorldError> {
    serde_json::from_str(body).map_err(|e| WorldError::MalformedResponse(e.to_string()))
}

/// The failure description of a non-OK envelope, or `None` when the call
/// succeeded. A missing code is treated as success.
fn failure_text(code: &Option<String>, message: &Option<String>) -> Option<String> {
    match code.as_deref() {
        Some(code) if code != "OK" => Some(match message {
            Some(msg) => format!("{}: {}", code, msg),
            None => code.to_string(),
        }),
        _ => None,
    }
}
