//! Roaming hazard sprites

use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

use super::action::Direction;
use super::food::random_position;
use super::state::Position;

/// A wandering hazard. Harmful on contact unless the snake is in rainbow
/// mode, in which case the snake's head knocks it out for a while.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardSprite {
    pub position: Position,
    /// Set while eliminated; the sprite comes back once this time passes
    pub respawn_at: Option<Duration>,
}

impl HazardSprite {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            respawn_at: None,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, grid_size: i32) -> Self {
        Self::new(random_position(rng, grid_size))
    }

    pub fn is_active(&self) -> bool {
        self.respawn_at.is_none()
    }

    /// Try one random cardinal step. A step that would leave the grid is
    /// dropped, so sprites at an edge sometimes stall.
    pub fn wander<R: Rng + ?Sized>(&mut self, rng: &mut R, grid_size: i32) {
        if !self.is_active() {
            return;
        }
        let Some(direction) = Direction::ALL.choose(rng) else {
            return;
        };
        let next = self.position.moved_in_direction(*direction);
        if next.in_grid(grid_size) {
            self.position = next;
        }
    }

    pub fn eliminate(&mut self, now: Duration, respawn_delay: Duration) {
        self.respawn_at = Some(now + respawn_delay);
    }

    /// Bring an eliminated sprite back at a fresh cell once its timer is up.
    /// Returns true if the sprite reappeared.
    pub fn update<R: Rng + ?Sized>(&mut self, now: Duration, rng: &mut R, grid_size: i32) -> bool {
        match self.respawn_at {
            Some(at) if now >= at => {
                self.position = random_position(rng, grid_size);
                self.respawn_at = None;
                true
            }
            _ => false,
        }
    }
}
