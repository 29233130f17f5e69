//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One grid step per tick
//! - Seeded RNG only
//! - No rendering, storage or host-messaging dependencies

pub mod autopilot;
pub mod config;
pub mod obstacles;
pub mod speed;
pub mod state;
pub mod tick;

pub use autopilot::choose_direction;
pub use config::GameConfig;
pub use obstacles::{OBSTACLE_ANCHORS, generate_obstacles};
pub use speed::SpeedPolicy;
pub use state::{Color, Direction, Food, GameState, GridPosition};
pub use tick::{Collision, TickOutcome, tick};
