//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable player order (player one first)
//! - No rendering or platform dependencies

pub mod engine;
pub mod fruit;
pub mod grid;
pub mod lifecycle;
pub mod schedule;
pub mod snake;
pub mod snapshot;
pub mod tick;

pub use engine::{Engine, GameListener, GamePhase, Player};
pub use fruit::{FRUIT_GLYPHS, Fruit, FruitManager, Placement};
pub use grid::{Direction, Position, distance, in_bounds, random_cell, wrap};
pub use lifecycle::{DeathOutcome, LifeState, RespawnCountdown, resolve_death};
pub use schedule::{FrameLoop, HandleSource, LoopHandle, TimerHandle};
pub use snake::{Palette, Snake, SnakeRules};
pub use snapshot::{GameSnapshot, SnakeView};
