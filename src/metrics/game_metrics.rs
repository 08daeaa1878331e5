//! Per-process session records; dropped when the process exits

use crate::game::GameState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameMetrics {
    pub high_score: u32,
    pub best_length: usize,
    pub games_played: u32,
    /// Whether the last finished game set a new high score
    pub new_record: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the longest snake while a game is running
    pub fn observe(&mut self, state: &GameState) {
        self.best_length = self.best_length.max(state.snake.len());
    }

    pub fn on_game_start(&mut self) {
        self.new_record = false;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        self.new_record = final_score > self.high_score;
        if self.new_record {
            self.high_score = final_score;
        }
    }
}
