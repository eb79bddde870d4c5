//! Read-only view of the simulation handed to the renderer
//!
//! A fresh value is built every tick; nothing in it aliases engine state.

use serde::Serialize;

use super::engine::{GamePhase, Player};
use super::fruit::Fruit;
use super::grid::{Direction, Position};
use super::lifecycle::LifeState;
use super::snake::Palette;

/// One player's snake as seen by the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeView {
    pub player: Player,
    /// Head first
    pub segments: Vec<Position>,
    pub direction: Direction,
    pub next_direction: Direction,
    pub palette: Palette,
    pub score: u32,
    pub lives: u32,
    pub life: LifeState,
    /// Seconds until respawn (0 when not respawning)
    pub respawn_countdown: u32,
}

impl SnakeView {
    pub fn head(&self) -> Option<Position> {
        self.segments.first().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// Ticks simulated since the game started
    pub tick: u64,
    pub grid_size: i32,
    /// One entry per player, player one first
    pub snakes: Vec<SnakeView>,
    pub fruits: Vec<Fruit>,
    /// Current tick interval (ms)
    pub speed_ms: u32,
    pub multiplayer: bool,
    pub no_boundaries: bool,
    pub allow_coiling: bool,
    pub dark_theme: bool,
    pub phase: GamePhase,
    pub paused: bool,
    /// Tick loop is scheduled
    pub loop_active: bool,
    /// Settings are waiting for a restart
    pub restart_pending: bool,
}

impl GameSnapshot {
    pub fn snake(&self, player: Player) -> Option<&SnakeView> {
        self.snakes.iter().find(|s| s.player == player)
    }

    pub fn score(&self, player: Player) -> u32 {
        self.snake(player).map_or(0, |s| s.score)
    }

    pub fn lives(&self, player: Player) -> u32 {
        self.snake(player).map_or(0, |s| s.lives)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
