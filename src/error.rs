//! Configuration errors
//!
//! Only configuration can fail. Gameplay anomalies are absorbed by the engine
//! and surface as state (lives, game over), never as errors.

use thiserror::Error;

use crate::consts::{MAX_GRID_SIZE, MAX_LIVES, MIN_GRID_SIZE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid size {0} is outside {min}..={max}", min = MIN_GRID_SIZE, max = MAX_GRID_SIZE)]
    GridSize(i32),
    #[error("lives {0} is outside 1..={max}", max = MAX_LIVES)]
    Lives(u32),
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}
