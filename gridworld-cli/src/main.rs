//! Command-line interface of the gridworld client.
use anyhow::Result;
use clap::{Parser, Subcommand};
use gridworld_client::{ClientConfig, GridWorldClient, JsonScoreStore};
use gridworld_core::{QAgentConfig, SessionConfig, TrainingSession, World};
use log::info;
use std::path::PathBuf;

/// Tabular Q-learning client for remote grid worlds
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Client configuration YAML; defaults plus environment otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Local best-score file
    #[arg(long, default_value = "points.json")]
    points: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train the agent in a world and persist the best reward
    Train {
        /// World to train in
        #[arg(short, long)]
        world: i64,

        /// Number of episodes
        #[arg(short, long, default_value_t = 100)]
        episodes: usize,

        /// Step guard per episode
        #[arg(long, default_value_t = 1000)]
        max_steps: usize,

        /// Agent configuration YAML; defaults otherwise
        #[arg(long)]
        agent_config: Option<PathBuf>,

        /// Seed of the agent's random source
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the current location and the most recent run
    Status,
    /// Show the team score as reported by the server
    Score,
}

fn client_config(args: &Args) -> Result<ClientConfig> {
    let config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    Ok(config.env_overrides())
}

fn train(
    mut client: GridWorldClient,
    points: PathBuf,
    world: i64,
    episodes: usize,
    max_steps: usize,
    agent_config: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<()> {
    let mut agent_config = match agent_config {
        Some(path) => QAgentConfig::load(path)?,
        None => QAgentConfig::default(),
    };
    if let Some(seed) = seed {
        agent_config = agent_config.seed(seed);
    }
    let session_config = SessionConfig::default()
        .world_id(world)
        .episodes(episodes)
        .max_steps_per_episode(max_steps);

    let mut store = JsonScoreStore::new(points, client.config().team_id.clone());
    let mut session = TrainingSession::build(session_config, agent_config);
    info!("training in world {} for {} episodes", world, episodes);
    let report = session.train(&mut client, &mut store)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn status(mut client: GridWorldClient) -> Result<()> {
    let location = client.locate()?;
    match &location.state {
        Some(state) => println!(
            "in world {} at ({}, {})",
            state.world_id, state.x, state.y
        ),
        None => println!("not in any world"),
    }
    if let Some(run_id) = &location.run_id {
        println!("run: {}", run_id);
    }
    if let Some(run) = client.last_runs(1)?.last() {
        println!("last run: {}", serde_json::to_string_pretty(run)?);
    }
    Ok(())
}

fn score(mut client: GridWorldClient) -> Result<()> {
    let score = client.score()?;
    println!("current: {:.2}", score.current);
    println!("best: {:.2}", score.best);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let client = GridWorldClient::new(client_config(&args)?);
    match args.command {
        Command::Train {
            world,
            episodes,
            max_steps,
            agent_config,
            seed,
        } => train(
            client,
            args.points.clone(),
            world,
            episodes,
            max_steps,
            agent_config,
            seed,
        ),
        Command::Status => status(client),
        Command::Score => score(client),
    }
}
