//! Read-only view of a game handed to the renderer each frame

use std::time::Duration;

use super::food::BonusFruit;
use super::state::{GameState, Position, Rgb};

#[derive(Debug, Clone, PartialEq)]
pub struct SnakeView {
    /// Head first
    pub body: Vec<Position>,
    pub color: Rgb,
    pub thickness: f32,
    pub rainbow: bool,
    pub rainbow_remaining: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FruitView {
    pub position: Position,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteView {
    pub position: Position,
    pub active: bool,
}

/// Everything a frame may draw. Owns its data so the renderer never
/// borrows engine state.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid_size: i32,
    pub snake: SnakeView,
    pub fruit: Vec<FruitView>,
    pub bonus: Option<FruitView>,
    pub sprites: Vec<SpriteView>,
    pub score: u32,
    /// Ticks played in this game
    pub steps: u32,
    pub elapsed: Duration,
    pub tick_interval: Duration,
    pub game_over: bool,
}

impl Snapshot {
    pub fn capture(state: &GameState, now: Duration) -> Self {
        let snake = &state.snake;
        Self {
            grid_size: state.grid_size,
            snake: SnakeView {
                body: snake.body.clone(),
                color: snake.color.rgb(),
                thickness: snake.thickness,
                rainbow: snake.is_rainbow(),
                rainbow_remaining: snake.rainbow_remaining(now),
            },
            fruit: state
                .food
                .ordinary
                .iter()
                .map(|fruit| FruitView {
                    position: fruit.position,
                    color: fruit.color,
                })
                .collect(),
            bonus: state.food.bonus.map(|bonus| FruitView {
                position: bonus.position,
                color: BonusFruit::COLOR,
            }),
            sprites: state
                .sprites
                .iter()
                .map(|sprite| SpriteView {
                    position: sprite.position,
                    active: sprite.is_active(),
                })
                .collect(),
            score: state.score,
            steps: state.steps,
            elapsed: state.elapsed(now),
            tick_interval: state.tick_interval,
            game_over: state.is_terminal(),
        }
    }

    pub fn head(&self) -> Option<Position> {
        self.snake.body.first().copied()
    }

    /// Elapsed time as mm:ss
    pub fn format_elapsed(&self) -> String {
        let total_secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}
