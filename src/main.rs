use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rainbow_snake::game::{GameConfig, GameEngine, MonotonicClock};
use rainbow_snake::modes::HumanMode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rainbow-snake")]
#[command(version, about = "Snake with roaming hazards, bonus fruit and a rainbow power-up")]
struct Cli {
    /// Grid side length in cells (overrides the config file)
    #[arg(long)]
    grid_size: Option<i32>,

    /// Seed the random number generator for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding any of the game's tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file (RUST_LOG controls the level)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// The terminal belongs to the game, so logs only ever go to a file
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("Failed to install log subscriber: {err}"))
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(grid_size) = cli.grid_size {
        config.grid_size = grid_size;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = load_config(&cli)?;
    info!(?config, seed = ?cli.seed, "configuration loaded");

    let engine = match cli.seed {
        Some(seed) => GameEngine::seeded(config, MonotonicClock::new(), seed),
        None => GameEngine::new(config),
    }
    .context("Invalid game configuration")?;

    let mut human_mode = HumanMode::new(engine);
    human_mode.run().await?;

    Ok(())
}
