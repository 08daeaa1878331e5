use std::time::Duration;

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::{
    action::{Action, Direction},
    clock::{Clock, MonotonicClock},
    config::GameConfig,
    food::FoodSet,
    snapshot::Snapshot,
    sprite::HazardSprite,
    state::{CollisionType, GameState, Position, Snake, SnakeRules},
};

/// Column the snake's head starts in
const START_COLUMN: i32 = 5;

/// Points for an ordinary fruit
pub const FRUIT_POINTS: u32 = 1;
/// Points for the bonus fruit
pub const BONUS_POINTS: u32 = 5;
/// Points for knocking out a sprite in rainbow mode
pub const SPRITE_POINTS: u32 = 2;
/// Points lost per hazard hit
pub const HAZARD_PENALTY: u32 = 1;

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Ordinary fruit eaten this step
    pub fruit_eaten: u32,
    pub bonus_eaten: bool,
    /// Sprites knocked out by the rainbow head
    pub sprites_eliminated: u32,
    /// Harmful sprite contacts
    pub hazard_hits: u32,
    /// Cause of game over, if it happened this step
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine<C: Clock = MonotonicClock> {
    config: GameConfig,
    clock: C,
    rng: StdRng,
}

impl GameEngine<MonotonicClock> {
    /// Create a new game engine on the wall clock with an entropy-seeded RNG
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_clock(config, MonotonicClock::new(), StdRng::from_entropy())
    }
}

impl<C: Clock> GameEngine<C> {
    /// Fails if the configuration does not pass [`GameConfig::validate`]
    pub fn with_clock(config: GameConfig, clock: C, rng: StdRng) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, clock, rng })
    }

    /// Deterministic engine for replays and tests
    pub fn seeded(config: GameConfig, clock: C, seed: u64) -> Result<Self> {
        Self::with_clock(config, clock, StdRng::seed_from_u64(seed))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let now = self.clock.now();
        let grid = self.config.grid_size;

        let snake = Snake::new(
            Position::new(START_COLUMN.min(grid - 1), grid / 2),
            Direction::Right,
            self.config.initial_snake_length,
        )
        .with_rules(SnakeRules::from(&self.config));

        let food = FoodSet::new(&mut self.rng, self.config.ordinary_fruit, grid);
        let sprites = (0..self.config.initial_sprites)
            .map(|_| HazardSprite::random(&mut self.rng, grid))
            .collect();

        GameState::new(snake, food, sprites, grid, self.config.initial_tick(), now)
    }

    /// Start over, but only once the current game has ended.
    /// Returns true if the state was replaced.
    pub fn restart(&mut self, state: &mut GameState) -> bool {
        if state.is_alive {
            return false;
        }
        info!(final_score = state.score, "restarting game");
        *state = self.reset();
        true
    }

    /// Capture what the renderer needs for the current moment
    pub fn snapshot(&self, state: &GameState) -> Snapshot {
        Snapshot::capture(state, self.clock.now())
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult {
                terminated: true,
                info: StepInfo::default(),
            };
        }

        let now = self.clock.now();
        let mut info = StepInfo::default();

        // Update direction based on action (prevent 180° turns)
        if let Action::Move(new_direction) = action {
            if !state.snake.direction.is_opposite(new_direction) {
                state.snake.direction = new_direction;
            }
        }

        state.snake.advance();
        state.snake.update_rainbow(now);

        self.resolve_collisions(state, now, &mut info);

        if state.is_alive {
            if let Some(collision_type) = self.check_fail(state) {
                state.is_alive = false;
                info.collision_type = Some(collision_type);
            }
        }

        let grid = state.grid_size;
        for sprite in &mut state.sprites {
            sprite.wander(&mut self.rng, grid);
        }

        self.spawn_sprites(state, now);
        self.update_speed(state, now);
        self.update_bonus(state, now);

        for sprite in &mut state.sprites {
            if sprite.update(now, &mut self.rng, grid) {
                debug!(x = sprite.position.x, y = sprite.position.y, "sprite respawned");
            }
        }

        state.steps += 1;

        if let Some(cause) = info.collision_type {
            info!(?cause, score = state.score, length = state.snake.len(), "game over");
        }

        StepResult {
            terminated: !state.is_alive,
            info,
        }
    }

    /// Fruit, bonus fruit, then sprites, all against the freshly moved head
    fn resolve_collisions(&mut self, state: &mut GameState, now: Duration, info: &mut StepInfo) {
        let head = state.snake.head();
        let grid = state.grid_size;

        let eaten: Vec<usize> = state.food.ordinary_at(head).collect();
        for slot in eaten {
            let color = state.food.ordinary[slot].color;
            state.snake.grow();
            state.snake.change_color(color);
            state.snake.fatten();
            state.food.respawn_ordinary(slot, &mut self.rng, grid);
            state.score += FRUIT_POINTS;
            info.fruit_eaten += 1;
            debug!(score = state.score, length = state.snake.len(), "ate fruit");
        }

        if state.food.take_bonus_at(head).is_some() {
            state.snake.activate_rainbow(now);
            state.score += BONUS_POINTS;
            info.bonus_eaten = true;
            debug!(score = state.score, "ate bonus fruit, rainbow on");
        }

        let respawn_delay = self.config.sprite_respawn_delay();
        for sprite in state.sprites.iter_mut() {
            if !sprite.is_active() || !state.snake.occupies(sprite.position) {
                continue;
            }

            if state.snake.is_rainbow() {
                // Only the head can knock a sprite out; body contact is harmless
                if sprite.position == head {
                    sprite.eliminate(now, respawn_delay);
                    state.score += SPRITE_POINTS;
                    info.sprites_eliminated += 1;
                    debug!(score = state.score, "sprite eliminated");
                }
                continue;
            }

            state.snake.shrink();
            state.snake.slim();
            state.score = state.score.saturating_sub(HAZARD_PENALTY);
            info.hazard_hits += 1;
            debug!(score = state.score, length = state.snake.len(), "hit by sprite");

            match state.snake.len() {
                1 => {
                    state.is_alive = false;
                    info.collision_type = Some(CollisionType::Exhausted);
                    break;
                }
                2 => state.snake.reset_color(),
                _ => {}
            }
        }
    }

    /// Check if the moved head ended the game
    fn check_fail(&self, state: &GameState) -> Option<CollisionType> {
        let head = state.snake.head();

        if !state.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if state.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Past the ramp start, add a sprite every cooldown period
    fn spawn_sprites(&mut self, state: &mut GameState, now: Duration) {
        if state.elapsed(now) <= self.config.ramp_start()
            || now.saturating_sub(state.last_sprite_spawn) <= self.config.sprite_spawn_cooldown()
        {
            return;
        }
        state
            .sprites
            .push(HazardSprite::random(&mut self.rng, state.grid_size));
        state.last_sprite_spawn = now;
        info!(sprites = state.sprites.len(), "new sprite");
    }

    /// Past the ramp start, shorten the tick every cooldown period
    fn update_speed(&self, state: &mut GameState, now: Duration) {
        if state.elapsed(now) <= self.config.ramp_start()
            || now.saturating_sub(state.last_speed_increase) <= self.config.speed_up_cooldown()
        {
            return;
        }
        state.tick_interval = state
            .tick_interval
            .saturating_sub(self.config.tick_step())
            .max(self.config.min_tick());
        state.last_speed_increase = now;
        info!(tick_ms = state.tick_interval.as_millis() as u64, "speed up");
    }

    fn update_bonus(&mut self, state: &mut GameState, now: Duration) {
        let grid = state.grid_size;
        if state
            .food
            .maybe_spawn_bonus(now, self.config.bonus_spawn_chance, &mut self.rng, grid)
        {
            debug!("bonus fruit appeared");
        }
        if state.food.expire_bonus(now, self.config.bonus_lifetime()) {
            debug!("bonus fruit expired");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::clock::ManualClock;
    use crate::game::food::{BonusFruit, Fruit};
    use crate::game::state::{Rgb, SnakeColor};

    /// Config with no random bonus fruit so tests control the board
    fn quiet_config() -> GameConfig {
        GameConfig {
            bonus_spawn_chance: 0.0,
            ..GameConfig::default()
        }
    }

    fn engine() -> (GameEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let engine = GameEngine::seeded(quiet_config(), clock.clone(), 17).unwrap();
        (engine, clock)
    }

    /// Fresh game with fruit parked in a corner and no sprites
    fn bare_state(engine: &mut GameEngine<ManualClock>) -> GameState {
        let mut state = engine.reset();
        for fruit in &mut state.food.ordinary {
            fruit.position = Position::new(0, 0);
        }
        state.sprites.clear();
        state
    }

    #[test]
    fn test_reset() {
        let (mut engine, _clock) = engine();
        let state = engine.reset();

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(5, 10));
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.food.ordinary.len(), 2);
        assert!(state.food.bonus.is_none());
        assert_eq!(state.sprites.len(), 1);
        assert_eq!(state.tick_interval, Duration::from_millis(150));
    }

    #[test]
    fn test_basic_movement() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert_eq!(result.info, StepInfo::default());
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.head(), Position::new(6, 10));
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_food_consumption() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);
        state.food.ordinary[0] = Fruit {
            position: Position::new(6, 10),
            color: Rgb::GREEN,
        };

        let result = engine.step(&mut state, Action::Continue);

        assert_eq!(result.info.fruit_eaten, 1);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.food.ordinary.len(), 2);
        assert_eq!(state.snake.color, SnakeColor::Colored(Rgb::GREEN));
    }

    #[test]
    fn test_two_fruit_on_one_cell_both_count() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);
        for fruit in &mut state.food.ordinary {
            fruit.position = Position::new(6, 10);
        }

        let result = engine.step(&mut state, Action::Continue);

        assert_eq!(result.info.fruit_eaten, 2);
        assert_eq!(state.score, 2);
        assert_eq!(state.snake.len(), 5);
    }

    #[test]
    fn test_bonus_fruit_triggers_rainbow() {
        let (mut engine, clock) = engine();
        let mut state = bare_state(&mut engine);
        clock.set(Duration::from_secs(3));
        state.food.bonus = Some(BonusFruit {
            position: Position::new(6, 10),
            spawned_at: Duration::from_secs(1),
        });

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.info.bonus_eaten);
        assert_eq!(state.score, 5);
        assert!(state.food.bonus.is_none());
        assert_eq!(state.snake.rainbow_since, Some(Duration::from_secs(3)));
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_rainbow_head_eliminates_sprite() {
        let (mut engine, clock) = engine();
        let mut state = bare_state(&mut engine);
        clock.set(Duration::from_secs(4));
        state.snake.activate_rainbow(Duration::from_secs(1));
        state.sprites.push(HazardSprite::new(Position::new(6, 10)));

        let result = engine.step(&mut state, Action::Continue);

        assert_eq!(result.info.sprites_eliminated, 1);
        assert_eq!(result.info.hazard_hits, 0);
        assert_eq!(state.score, 2);
        assert_eq!(state.snake.len(), 3);
        assert!(!state.sprites[0].is_active());
        assert_eq!(state.sprites[0].respawn_at, Some(Duration::from_secs(14)));
    }

    #[test]
    fn test_rainbow_body_contact_is_harmless() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);
        state.snake.activate_rainbow(Duration::ZERO);
        // After the move the body is (6,10), (5,10), (4,10)
        state.sprites.push(HazardSprite::new(Position::new(4, 10)));

        let result = engine.step(&mut state, Action::Continue);

        assert_eq!(result.info.sprites_eliminated, 0);
        assert_eq!(result.info.hazard_hits, 0);
        assert_eq!(state.snake.len(), 3);
        assert!(state.sprites[0].is_active());
    }

    #[test]
    fn test_hazard_hit_shrinks_and_costs_a_point() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);
        state.snake.grow();
        state.score = 3;
        state.sprites.push(HazardSprite::new(Position::new(6, 10)));

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert_eq!(result.info.hazard_hits, 1);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.score, 2);
        assert!(state.snake.thickness < 1.0);
    }

    #[test]
    fn test_hazard_hit_on_body_segment() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);
        state.snake.grow();
        state.sprites.push(HazardSprite::new(Position::new(4, 10)));

        let result = engine.step(&mut state, Action::Continue);

        assert_eq!(result.info.hazard_hits, 1);
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_score_never_negative() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);
        state.snake.grow();
        state.sprites.push(HazardSprite::new(Position::new(6, 10)));

        engine.step(&mut state, Action::Continue);

        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_knocked_to_two_segments_loses_color() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);
        state.snake.change_color(Rgb::RED);
        state.sprites.push(HazardSprite::new(Position::new(6, 10)));

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.snake.color, SnakeColor::Uncolored);
    }

    #[test]
    fn test_hazard_hit_at_length_one_ends_game() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);
        state.snake = Snake::new(Position::new(5, 10), Direction::Right, 1);
        state.sprites.push(HazardSprite::new(Position::new(6, 10)));

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert!(!state.is_alive);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(result.info.collision_type, Some(CollisionType::Exhausted));
    }

    #[test]
    fn test_two_hits_in_one_tick_exhaust_the_snake() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);
        // After the move the body is (6,10), (5,10), (4,10)
        state.sprites.push(HazardSprite::new(Position::new(6, 10)));
        state.sprites.push(HazardSprite::new(Position::new(5, 10)));

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert_eq!(result.info.hazard_hits, 2);
        assert_eq!(result.info.collision_type, Some(CollisionType::Exhausted));
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_two_hits_in_one_tick_from_four_segments() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);
        state.snake.grow();
        state.snake.change_color(Rgb::BLUE);
        state.score = 5;
        // After the move the body is (6,10), (5,10), (4,10), (3,10)
        state.sprites.push(HazardSprite::new(Position::new(6, 10)));
        state.sprites.push(HazardSprite::new(Position::new(5, 10)));

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert_eq!(result.info.hazard_hits, 2);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.snake.color, SnakeColor::Uncolored);
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_single_segment_snake_eats_and_survives() {
        let clock = ManualClock::new();
        let config = GameConfig {
            initial_snake_length: 1,
            ..quiet_config()
        };
        let mut engine = GameEngine::seeded(config, clock, 17).unwrap();
        let mut state = bare_state(&mut engine);
        assert_eq!(state.snake.len(), 1);
        state.food.ordinary[0].position = Position::new(6, 10);

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert_eq!(result.info.collision_type, None);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.score, 1);
        for fruit in &mut state.food.ordinary {
            fruit.position = Position::new(0, 0);
        }

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert_eq!(
            state.snake.body,
            vec![Position::new(7, 10), Position::new(6, 10)]
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(GameEngine::seeded(GameConfig::new(0), ManualClock::new(), 1).is_err());

        let config = GameConfig {
            initial_snake_length: 0,
            ..GameConfig::default()
        };
        assert!(GameEngine::seeded(config, ManualClock::new(), 1).is_err());
    }

    #[test]
    fn test_wall_collision() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);
        state.snake = Snake::new(Position::new(0, 5), Direction::Left, 1);

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert!(!state.is_alive);
        assert_eq!(result.info.collision_type, Some(CollisionType::Wall));
    }

    #[test]
    fn test_self_collision() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);

        // Snake at (5, 10) going Right with length 5
        state.snake = Snake::new(Position::new(5, 10), Direction::Right, 5);

        engine.step(&mut state, Action::Move(Direction::Down));
        engine.step(&mut state, Action::Move(Direction::Left));
        // Up lands on the segment at (4, 10)
        let result = engine.step(&mut state, Action::Move(Direction::Up));

        assert!(result.terminated);
        assert_eq!(
            result.info.collision_type,
            Some(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);

        engine.step(&mut state, Action::Move(Direction::Left));

        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.snake.head(), Position::new(6, 10));
        assert!(state.is_alive);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let (mut engine, clock) = engine();
        let mut state = bare_state(&mut engine);
        state.is_alive = false;
        let before = state.clone();

        clock.advance(Duration::from_secs(120));
        let result = engine.step(&mut state, Action::Move(Direction::Up));

        assert!(result.terminated);
        assert_eq!(state, before);
    }

    #[test]
    fn test_rainbow_expires_during_step() {
        let (mut engine, clock) = engine();
        let mut state = bare_state(&mut engine);
        state.snake.activate_rainbow(Duration::ZERO);

        clock.set(Duration::from_secs(10));
        engine.step(&mut state, Action::Continue);
        assert!(state.snake.is_rainbow());

        clock.set(Duration::from_millis(10_001));
        engine.step(&mut state, Action::Continue);
        assert!(!state.snake.is_rainbow());
    }

    #[test]
    fn test_no_ramp_before_threshold() {
        let (mut engine, clock) = engine();
        let mut state = bare_state(&mut engine);

        clock.set(Duration::from_secs(60));
        engine.step(&mut state, Action::Continue);

        assert!(state.sprites.is_empty());
        assert_eq!(state.tick_interval, Duration::from_millis(150));
    }

    #[test]
    fn test_ramp_adds_sprite_and_speeds_up() {
        let (mut engine, clock) = engine();
        let mut state = bare_state(&mut engine);

        clock.set(Duration::from_secs(61));
        engine.step(&mut state, Action::Continue);
        assert_eq!(state.sprites.len(), 1);
        assert_eq!(state.tick_interval, Duration::from_millis(140));

        // Cooldown still running
        state.sprites.clear();
        clock.set(Duration::from_secs(90));
        engine.step(&mut state, Action::Continue);
        assert!(state.sprites.is_empty());
        assert_eq!(state.tick_interval, Duration::from_millis(140));

        clock.set(Duration::from_millis(91_001));
        engine.step(&mut state, Action::Continue);
        assert_eq!(state.sprites.len(), 1);
        assert_eq!(state.tick_interval, Duration::from_millis(130));
    }

    #[test]
    fn test_tick_interval_floors_at_minimum() {
        let (mut engine, clock) = engine();
        let mut state = bare_state(&mut engine);
        let mut previous = state.tick_interval;

        for i in 1..=12u64 {
            state.sprites.clear();
            clock.set(Duration::from_secs(60 + 31 * i));
            engine.step(&mut state, Action::Continue);
            assert!(state.tick_interval <= previous);
            previous = state.tick_interval;
        }

        assert!(state.is_alive);
        assert_eq!(state.tick_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_bonus_fruit_expires() {
        let (mut engine, clock) = engine();
        let mut state = bare_state(&mut engine);
        state.food.bonus = Some(BonusFruit {
            position: Position::new(15, 15),
            spawned_at: Duration::ZERO,
        });

        clock.set(Duration::from_secs(5));
        engine.step(&mut state, Action::Continue);
        assert!(state.food.bonus.is_some());

        clock.set(Duration::from_millis(5_001));
        engine.step(&mut state, Action::Continue);
        assert!(state.food.bonus.is_none());
    }

    #[test]
    fn test_restart_only_when_terminal() {
        let (mut engine, _clock) = engine();
        let mut state = bare_state(&mut engine);
        state.score = 9;

        assert!(!engine.restart(&mut state));
        assert_eq!(state.score, 9);

        state.is_alive = false;
        assert!(engine.restart(&mut state));
        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.sprites.len(), 1);
    }
}
