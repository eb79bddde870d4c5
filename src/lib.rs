//! Snake Duel - tick-driven grid snake simulation
//!
//! Core modules:
//! - `sim`: Simulation core (snakes, fruit, tick loop, respawn rules)
//! - `settings`: Game configuration and mid-game changes
//! - `diagnostics`: Optional event/timing collector injected into the engine
//! - `error`: Configuration errors
//!
//! Rendering and input capture live outside this crate. A host drives the
//! engine with [`sim::Engine::frame`], writes direction intents with
//! [`sim::Engine::set_direction`] and receives one [`sim::GameSnapshot`] per tick.

pub mod diagnostics;
pub mod error;
pub mod settings;
pub mod sim;

pub use diagnostics::Diagnostics;
pub use error::ConfigError;
pub use settings::{Settings, SettingsPatch, Theme};

/// Game configuration constants
pub mod consts {
    /// Default board edge length (cells)
    pub const DEFAULT_GRID_SIZE: i32 = 20;
    /// Smallest board that fits a fresh snake and the second player's spawn
    pub const MIN_GRID_SIZE: i32 = 8;
    pub const MAX_GRID_SIZE: i32 = 200;
    /// Grid sizes offered by a settings UI
    pub const GRID_SIZE_OPTIONS: [i32; 5] = [10, 15, 20, 25, 30];

    /// Tick interval at game start (ms)
    pub const INITIAL_SPEED_MS: u32 = 150;
    /// Fastest tick interval (ms); speed never goes below this
    pub const MIN_SPEED_MS: u32 = 80;
    /// Tick interval reduction per fruit eaten (ms)
    pub const SPEED_DECREMENT_MS: u32 = 5;
    /// Largest frame delta fed into the accumulator (ms)
    pub const MAX_FRAME_DELTA_MS: f64 = 500.0;

    pub const INITIAL_SNAKE_LENGTH: usize = 3;
    pub const DEFAULT_LIVES: u32 = 1;
    pub const MAX_LIVES: u32 = 9;
    /// Lives offered by a settings UI
    pub const LIVES_OPTIONS: [u32; 5] = [1, 2, 3, 5, 9];

    /// Respawn delay (whole seconds)
    pub const RESPAWN_SECONDS: u32 = 3;
    /// Minimum Euclidean distance between a respawn cell and other live snakes
    pub const SAFE_RESPAWN_DISTANCE: f32 = 5.0;
    pub const SAFE_RESPAWN_ATTEMPTS: u32 = 50;
    /// Respawn candidates stay this many cells away from every edge
    pub const RESPAWN_EDGE_MARGIN: i32 = 2;
    /// Vertical offset of the second snake's spawn from the board centre
    pub const SECOND_SNAKE_OFFSET: i32 = 5;

    /// Fruit kept on the board
    pub const FRUIT_TARGET_COUNT: usize = 2;
    /// Ticks between fruit steps
    pub const FRUIT_MOVE_INTERVAL: u32 = 3;
    pub const SCORE_PER_FRUIT: u32 = 10;

    /// Tick duration above which a slow-step warning is logged (ms)
    pub const SLOW_STEP_MS: f64 = 16.0;
}
