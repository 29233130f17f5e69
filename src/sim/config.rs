use serde::{Deserialize, Serialize};

use super::speed::SpeedPolicy;
use crate::consts::*;

/// Tunables for a single board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the grid (cells)
    pub grid_width: i32,
    /// Height of the grid (cells)
    pub grid_height: i32,
    /// Snake length at the start of an attempt
    pub initial_snake_length: usize,
    /// Tick interval at score 0 (ms)
    pub base_tick_ms: u32,
    /// Fastest tick interval any policy may produce (ms)
    pub min_tick_ms: u32,
    /// Points awarded per food item
    pub points_per_food: u32,
    /// How the tick interval reacts to score
    pub speed_policy: SpeedPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            initial_snake_length: INITIAL_SNAKE_LENGTH,
            base_tick_ms: BASE_TICK_MS,
            min_tick_ms: MIN_TICK_MS,
            points_per_food: POINTS_PER_FOOD,
            speed_policy: SpeedPolicy::Fixed,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom grid size (each side at least 1)
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            grid_width: width.max(1),
            grid_height: height.max(1),
            ..Default::default()
        }
    }

    /// Tick interval for the given score under the configured policy
    pub fn tick_interval_ms(&self, score: u32) -> u32 {
        self.speed_policy
            .interval_ms(score, self.base_tick_ms, self.min_tick_ms)
    }
}
