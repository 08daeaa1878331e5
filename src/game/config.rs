use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Smallest grid that still fits the starting snake with room to turn
pub const MIN_GRID_SIZE: i32 = 8;

/// Tunable rules of the game.
///
/// Every constant the simulation uses lives here under a name. The defaults
/// are the canonical rule set; a JSON file may override any subset of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid, in cells
    pub grid_size: i32,
    /// Segments the snake starts with
    pub initial_snake_length: usize,
    /// Number of ordinary fruit kept on the board
    pub ordinary_fruit: usize,
    /// Number of hazard sprites present at the start of a game
    pub initial_sprites: usize,

    /// Tick interval at the start of a game
    pub initial_tick_ms: u64,
    /// Fastest the tick interval may become
    pub min_tick_ms: u64,
    /// How much each speed-up shortens the tick interval
    pub tick_step_ms: u64,

    /// Elapsed game time after which sprites multiply and the game speeds up
    pub ramp_start_ms: u64,
    /// Minimum gap between two sprite spawns
    pub sprite_spawn_cooldown_ms: u64,
    /// Minimum gap between two speed-ups
    pub speed_up_cooldown_ms: u64,
    /// How long an eliminated sprite stays away
    pub sprite_respawn_delay_ms: u64,

    /// How long rainbow mode lasts once triggered
    pub rainbow_duration_ms: u64,
    /// How long an uneaten bonus fruit stays on the board
    pub bonus_lifetime_ms: u64,
    /// Chance per tick that a bonus fruit appears while none is present
    pub bonus_spawn_chance: f64,

    /// Thickness change per grow or shrink
    pub thickness_step: f32,
    pub min_thickness: f32,
    pub max_thickness: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_snake_length: 3,
            ordinary_fruit: 2,
            initial_sprites: 1,
            initial_tick_ms: 150,
            min_tick_ms: 50,
            tick_step_ms: 10,
            ramp_start_ms: 60_000,
            sprite_spawn_cooldown_ms: 30_000,
            speed_up_cooldown_ms: 30_000,
            sprite_respawn_delay_ms: 10_000,
            rainbow_duration_ms: 10_000,
            bonus_lifetime_ms: 5_000,
            bonus_spawn_chance: 0.01,
            thickness_step: 0.1,
            min_thickness: 0.5,
            max_thickness: 1.0,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: i32) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Load overrides from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Reject rule sets the engine cannot run sensibly
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_size >= MIN_GRID_SIZE,
            "grid_size must be at least {MIN_GRID_SIZE}, got {}",
            self.grid_size
        );
        ensure!(
            (1..=5).contains(&self.initial_snake_length),
            "initial_snake_length must be between 1 and 5, got {}",
            self.initial_snake_length
        );
        ensure!(self.ordinary_fruit > 0, "ordinary_fruit must be at least 1");
        ensure!(self.min_tick_ms > 0, "min_tick_ms must be positive");
        ensure!(
            self.initial_tick_ms >= self.min_tick_ms,
            "initial_tick_ms ({}) is below min_tick_ms ({})",
            self.initial_tick_ms,
            self.min_tick_ms
        );
        ensure!(
            (0.0..=1.0).contains(&self.bonus_spawn_chance),
            "bonus_spawn_chance must be within [0, 1], got {}",
            self.bonus_spawn_chance
        );
        ensure!(self.tick_step_ms > 0, "tick_step_ms must be positive");
        ensure!(
            self.thickness_step > 0.0,
            "thickness_step must be positive, got {}",
            self.thickness_step
        );
        ensure!(
            self.min_thickness > 0.0 && self.min_thickness <= self.max_thickness,
            "thickness bounds are inverted: [{}, {}]",
            self.min_thickness,
            self.max_thickness
        );
        Ok(())
    }

    pub fn initial_tick(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }

    pub fn min_tick(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }

    pub fn tick_step(&self) -> Duration {
        Duration::from_millis(self.tick_step_ms)
    }

    pub fn ramp_start(&self) -> Duration {
        Duration::from_millis(self.ramp_start_ms)
    }

    pub fn sprite_spawn_cooldown(&self) -> Duration {
        Duration::from_millis(self.sprite_spawn_cooldown_ms)
    }

    pub fn speed_up_cooldown(&self) -> Duration {
        Duration::from_millis(self.speed_up_cooldown_ms)
    }

    pub fn sprite_respawn_delay(&self) -> Duration {
        Duration::from_millis(self.sprite_respawn_delay_ms)
    }

    pub fn rainbow_duration(&self) -> Duration {
        Duration::from_millis(self.rainbow_duration_ms)
    }

    pub fn bonus_lifetime(&self) -> Duration {
        Duration::from_millis(self.bonus_lifetime_ms)
    }
}
