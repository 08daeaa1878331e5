//! Core game logic module for the snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Time comes from an injectable [`Clock`] and randomness from a seedable RNG, so a
//! whole game can be replayed deterministically.

pub mod action;
pub mod clock;
pub mod config;
pub mod engine;
pub mod food;
pub mod snapshot;
pub mod sprite;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use food::{BonusFruit, FoodSet, Fruit};
pub use snapshot::{FruitView, SnakeView, Snapshot, SpriteView};
pub use sprite::HazardSprite;
pub use state::{CollisionType, GameState, Position, Rgb, Snake, SnakeColor};
