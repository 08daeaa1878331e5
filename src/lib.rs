//! Rainbow Snake - a terminal snake game with hazards and power-ups
//!
//! This library provides:
//! - Core game logic with an injectable clock (game module)
//! - TUI rendering from immutable snapshots (render module)
//! - Keyboard decoding (input module)
//! - Session records (metrics module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
