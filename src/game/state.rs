use std::time::Duration;

use super::action::Direction;
use super::config::GameConfig;
use super::food::FoodSet;
use super::sprite::HazardSprite;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Whether the position lies on a square grid of the given side
    pub fn in_grid(&self, grid_size: i32) -> bool {
        (0..grid_size).contains(&self.x) && (0..grid_size).contains(&self.y)
    }
}

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Component-wise integer average, clamped to the displayable range
    pub fn blend(self, other: Rgb) -> Rgb {
        fn mid(a: u8, b: u8) -> u8 {
            ((u16::from(a) + u16::from(b)) / 2).min(u16::from(u8::MAX)) as u8
        }
        Rgb::new(mid(self.r, other.r), mid(self.g, other.g), mid(self.b, other.b))
    }

    /// Scale every channel by `factor`, clamped to [0, 1]
    pub fn faded(self, factor: f32) -> Rgb {
        let factor = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (f32::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Rgb::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// Color state of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeColor {
    /// Has not eaten yet (or was knocked back to a stub); drawn white
    Uncolored,
    Colored(Rgb),
}

impl SnakeColor {
    pub fn rgb(&self) -> Rgb {
        match self {
            SnakeColor::Uncolored => Rgb::WHITE,
            SnakeColor::Colored(rgb) => *rgb,
        }
    }
}

/// Per-game rules the snake needs to update itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnakeRules {
    pub thickness_step: f32,
    pub min_thickness: f32,
    pub max_thickness: f32,
    pub rainbow_duration: Duration,
}

impl From<&GameConfig> for SnakeRules {
    fn from(config: &GameConfig) -> Self {
        Self {
            thickness_step: config.thickness_step,
            min_thickness: config.min_thickness,
            max_thickness: config.max_thickness,
            rainbow_duration: config.rainbow_duration(),
        }
    }
}

impl Default for SnakeRules {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
    pub color: SnakeColor,
    /// Drawn width of the body, within the rule bounds
    pub thickness: f32,
    /// When rainbow mode was switched on, if it is on
    pub rainbow_since: Option<Duration>,
    rules: SnakeRules,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        for i in 1..length.max(1) {
            let prev = body[i - 1];
            body.push(prev.moved_by(-dx, -dy));
        }

        let rules = SnakeRules::default();
        Self {
            body,
            direction,
            color: SnakeColor::Uncolored,
            thickness: rules.max_thickness,
            rainbow_since: None,
            rules,
        }
    }

    /// Replace the default rules with a specific game's rules
    pub fn with_rules(mut self, rules: SnakeRules) -> Self {
        self.rules = rules;
        self.thickness = rules.max_thickness;
        self
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Length without the stacked tail copies `grow` leaves until the next move
    pub fn settled_len(&self) -> usize {
        let mut len = self.body.len();
        while len > 1 && self.body[len - 1] == self.body[len - 2] {
            len -= 1;
        }
        len
    }

    /// Get body segments (excluding head and pending growth)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..self.settled_len()]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Check if position is anywhere on the snake, head included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Translate one step: new head in front, tail cell dropped
    pub fn advance(&mut self) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.insert(0, new_head);
        self.body.pop();
    }

    /// Duplicate the tail; the next move uncovers the extra segment
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.body.push(tail);
    }

    /// Drop the tail unless only the head is left. Returns whether a
    /// segment was removed.
    pub fn shrink(&mut self) -> bool {
        if self.body.len() > 1 {
            self.body.pop();
            true
        } else {
            false
        }
    }

    /// First fruit paints the snake, later fruit mix into the current color
    pub fn change_color(&mut self, color: Rgb) {
        self.color = match self.color {
            SnakeColor::Uncolored => SnakeColor::Colored(color),
            SnakeColor::Colored(current) => SnakeColor::Colored(current.blend(color)),
        };
    }

    pub fn reset_color(&mut self) {
        self.color = SnakeColor::Uncolored;
    }

    pub fn fatten(&mut self) {
        self.thickness = (self.thickness + self.rules.thickness_step).min(self.rules.max_thickness);
    }

    pub fn slim(&mut self) {
        self.thickness = (self.thickness - self.rules.thickness_step).max(self.rules.min_thickness);
    }

    pub fn activate_rainbow(&mut self, now: Duration) {
        self.rainbow_since = Some(now);
    }

    /// Switch rainbow mode off once it has run strictly longer than its duration
    pub fn update_rainbow(&mut self, now: Duration) {
        if let Some(since) = self.rainbow_since {
            if now.saturating_sub(since) > self.rules.rainbow_duration {
                self.rainbow_since = None;
            }
        }
    }

    pub fn is_rainbow(&self) -> bool {
        self.rainbow_since.is_some()
    }

    /// Time left in rainbow mode, if active
    pub fn rainbow_remaining(&self, now: Duration) -> Option<Duration> {
        self.rainbow_since
            .map(|since| self.rules.rainbow_duration.saturating_sub(now.saturating_sub(since)))
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the grid
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Hazard hits wore the snake down to its head
    Exhausted,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: FoodSet,
    pub sprites: Vec<HazardSprite>,
    pub grid_size: i32,
    pub score: u32,
    pub steps: u32,
    pub is_alive: bool,
    /// Clock reading when this game began
    pub started_at: Duration,
    pub last_sprite_spawn: Duration,
    pub last_speed_increase: Duration,
    /// Current pause between ticks; shrinks as the game ramps up
    pub tick_interval: Duration,
}

impl GameState {
    /// Create a new game state starting at `now`
    pub fn new(
        snake: Snake,
        food: FoodSet,
        sprites: Vec<HazardSprite>,
        grid_size: i32,
        tick_interval: Duration,
        now: Duration,
    ) -> Self {
        Self {
            snake,
            food,
            sprites,
            grid_size,
            score: 0,
            steps: 0,
            is_alive: true,
            started_at: now,
            last_sprite_spawn: now,
            last_speed_increase: now,
            tick_interval,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.in_grid(self.grid_size)
    }

    /// Time played in this game
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started_at)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_alive
    }
}
