//! Game settings and preferences
//!
//! Persisted as JSON next to the high score.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::StorageError;
use crate::persistence::KeyValueStore;
use crate::sim::{GameConfig, SpeedPolicy};

/// Smallest grid side that still fits the obstacle layout
pub const MIN_GRID_SIDE: i32 = 8;
/// Largest grid side the HUD is laid out for
pub const MAX_GRID_SIDE: i32 = 64;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    pub grid_width: i32,
    pub grid_height: i32,
    pub initial_snake_length: usize,

    // === Pace ===
    /// Tick interval at score 0 (ms)
    pub base_tick_ms: u32,
    /// Fastest tick interval (ms)
    pub min_tick_ms: u32,
    pub speed_policy: SpeedPolicy,

    // === Scoring ===
    pub points_per_food: u32,

    // === Demo ===
    /// Let the autopilot steer from the first tick
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            initial_snake_length: INITIAL_SNAKE_LENGTH,
            base_tick_ms: BASE_TICK_MS,
            min_tick_ms: MIN_TICK_MS,
            speed_policy: SpeedPolicy::Fixed,
            points_per_food: POINTS_PER_FOOD,
            autopilot: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "chroma_snake_settings";

    /// Board configuration with out-of-range values pulled back into range
    pub fn game_config(&self) -> GameConfig {
        let grid_width = self.grid_width.clamp(MIN_GRID_SIDE, MAX_GRID_SIDE);
        let grid_height = self.grid_height.clamp(MIN_GRID_SIDE, MAX_GRID_SIDE);
        // Initial snake must fit between the center and the left obstacle
        let max_length = (grid_width / 4).max(1) as usize;
        let min_tick_ms = self.min_tick_ms.max(1);

        GameConfig {
            grid_width,
            grid_height,
            initial_snake_length: self.initial_snake_length.clamp(1, max_length),
            base_tick_ms: self.base_tick_ms.max(min_tick_ms),
            min_tick_ms,
            points_per_food: self.points_per_food,
            speed_policy: self.speed_policy,
        }
    }

    /// Load settings; a missing key yields defaults
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, StorageError> {
        match store.get(Self::STORAGE_KEY)? {
            None => Ok(Self::default()),
            Some(json) => serde_json::from_str(&json).map_err(|_| StorageError::Corrupt {
                key: Self::STORAGE_KEY.to_string(),
                value: json,
            }),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        let json = serde_json::to_string(self).map_err(|e| StorageError::Write {
            key: Self::STORAGE_KEY.to_string(),
            reason: e.to_string(),
        })?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
