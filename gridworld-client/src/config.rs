//! Client configuration.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`GridWorldClient`](crate::GridWorldClient).
///
/// Values come from three layers: the defaults below, an optional YAML file,
/// and finally the environment (`GW_ENDPOINT`, `INDEX_ENDPOINT`, `TEAM_ID`,
/// `USER_ID`, `API_KEY`), each layer overriding the previous one.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ClientConfig {
    /// Endpoint of the world operations (location, enter, move).
    pub gw_endpoint: String,

    /// Endpoint of the score and run listings.
    pub index_endpoint: String,

    /// Team identifier sent in every payload.
    pub team_id: String,

    /// Value of the `X-User-ID` header.
    pub user_id: String,

    /// Value of the `X-API-Key` header.
    pub api_key: String,

    /// Number of retries after a transport-level failure.
    pub retries: u32,

    /// Fixed pause between retries, in milliseconds.
    pub backoff_ms: u64,

    /// Whether a move that leaves the position unchanged ends the episode.
    pub block_is_terminal: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gw_endpoint: "https://www.notexponential.com/aip2pgaming/api/rl/gw.php".into(),
            index_endpoint: "https://www.notexponential.com/aip2pgaming/api/index.php".into(),
            team_id: String::new(),
            user_id: String::new(),
            api_key: String::new(),
            retries: 2,
            backoff_ms: 500,
            block_is_terminal: false,
        }
    }
}

impl ClientConfig {
    /// Sets the world endpoint.
    pub fn gw_endpoint(mut self, v: impl Into<String>) -> Self {
        self.gw_endpoint = v.into();
        self
    }

    /// Sets the score endpoint.
    pub fn index_endpoint(mut self, v: impl Into<String>) -> Self {
        self.index_endpoint = v.into();
        self
    }

    /// Sets the team identifier.
    pub fn team_id(mut self, v: impl Into<String>) -> Self {
        self.team_id = v.into();
        self
    }

    /// Sets the user identifier.
    pub fn user_id(mut self, v: impl Into<String>) -> Self {
        self.user_id = v.into();
        self
    }

    /// Sets the API key.
    pub fn api_key(mut self, v: impl Into<String>) -> Self {
        self.api_key = v.into();
        self
    }

    /// Sets the retry count.
    pub fn retries(mut self, v: u32) -> Self {
        self.retries = v;
        self
    }

    /// Sets the retry backoff in milliseconds.
    pub fn backoff_ms(mut self, v: u64) -> Self {
        self.backoff_ms = v;
        self
    }

    /// Sets whether blocked moves end the episode.
    pub fn block_is_terminal(mut self, v: bool) -> Self {
        self.block_is_terminal = v;
        self
    }

    /// Overrides fields from the environment where the variables are set.
    pub fn env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("GW_ENDPOINT") {
            self.gw_endpoint = v;
        }
        if let Ok(v) = env::var("INDEX_ENDPOINT") {
            self.index_endpoint = v;
        }
        if let Ok(v) = env::var("TEAM_ID") {
            self.team_id = v;
        }
        if let Ok(v) = env::var("USER_ID") {
            self.user_id = v;
        }
        if let Ok(v) = env::var("API_KEY") {
            self.api_key = v;
        }
        self
    }

    /// Constructs [`ClientConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ClientConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn yaml_roundtrip() -> Result<()> {
        let dir = TempDir::new("client-config")?;
        let path = dir.path().join("client.yaml");
        let config = ClientConfig::default()
            .team_id("1449")
            .user_id("3669")
            .api_key("secret")
            .retries(5);
        config.save(&path)?;
        let restored = ClientConfig::load(&path)?;
        assert_eq!(config, restored);
        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() {
        std::env::set_var("TEAM_ID", "9999");
        let config = ClientConfig::default().team_id("1449").env_overrides();
        assert_eq!(config.team_id, "9999");
        std::env::remove_var("TEAM_ID");
    }
}
