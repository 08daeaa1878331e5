//! Ordinary fruit and the rare bonus fruit

use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

use super::state::{Position, Rgb};

/// Colors an ordinary fruit can take
pub const FRUIT_PALETTE: [Rgb; 3] = [Rgb::RED, Rgb::GREEN, Rgb::BLUE];

/// Uniformly random cell on a square grid
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, grid_size: i32) -> Position {
    Position::new(rng.gen_range(0..grid_size), rng.gen_range(0..grid_size))
}

/// An ordinary fruit: worth one point and tints the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fruit {
    pub position: Position,
    pub color: Rgb,
}

impl Fruit {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, grid_size: i32) -> Self {
        let position = random_position(rng, grid_size);
        let color = *FRUIT_PALETTE.choose(rng).unwrap_or(&Rgb::RED);
        Self { position, color }
    }
}

/// Short-lived fruit that triggers rainbow mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusFruit {
    pub position: Position,
    pub spawned_at: Duration,
}

impl BonusFruit {
    /// Fixed display color; bonus fruit never tint the snake
    pub const COLOR: Rgb = Rgb::new(255, 215, 0);

    pub fn is_expired(&self, now: Duration, lifetime: Duration) -> bool {
        now.saturating_sub(self.spawned_at) > lifetime
    }
}

/// All fruit on the board
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodSet {
    /// Fixed number of slots; an eaten slot is re-rolled in place
    pub ordinary: Vec<Fruit>,
    pub bonus: Option<BonusFruit>,
}

impl FoodSet {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, count: usize, grid_size: i32) -> Self {
        Self {
            ordinary: (0..count).map(|_| Fruit::random(rng, grid_size)).collect(),
            bonus: None,
        }
    }

    /// Re-roll one slot with a fresh position and color
    pub fn respawn_ordinary<R: Rng + ?Sized>(&mut self, slot: usize, rng: &mut R, grid_size: i32) {
        if let Some(fruit) = self.ordinary.get_mut(slot) {
            *fruit = Fruit::random(rng, grid_size);
        }
    }

    /// Roll for a bonus fruit if none is on the board. Returns true on spawn.
    pub fn maybe_spawn_bonus<R: Rng + ?Sized>(
        &mut self,
        now: Duration,
        chance: f64,
        rng: &mut R,
        grid_size: i32,
    ) -> bool {
        if self.bonus.is_some() || !rng.gen_bool(chance.clamp(0.0, 1.0)) {
            return false;
        }
        self.bonus = Some(BonusFruit {
            position: random_position(rng, grid_size),
            spawned_at: now,
        });
        true
    }

    /// Drop the bonus fruit once it outlived its lifetime. Returns true if it did.
    pub fn expire_bonus(&mut self, now: Duration, lifetime: Duration) -> bool {
        match self.bonus {
            Some(bonus) if bonus.is_expired(now, lifetime) => {
                self.bonus = None;
                true
            }
            _ => false,
        }
    }

    /// Remove and return the bonus fruit if it sits on `pos`
    pub fn take_bonus_at(&mut self, pos: Position) -> Option<BonusFruit> {
        match self.bonus {
            Some(bonus) if bonus.position == pos => self.bonus.take(),
            _ => None,
        }
    }

    pub fn ordinary_at(&self, pos: Position) -> impl Iterator<Item = usize> + '_ {
        self.ordinary
            .iter()
            .enumerate()
            .filter(move |(_, fruit)| fruit.position == pos)
            .map(|(slot, _)| slot)
    }
}
