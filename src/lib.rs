//! Chroma Snake - A single-screen snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, food, speed)
//! - `attempts`: Practice/real attempt progression and score reports
//! - `game`: Live session wiring the simulation to its collaborators
//! - `host`: Outbound score messages to the embedding shell
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `platform`: Browser timer abstraction

pub mod attempts;
pub mod error;
pub mod game;
pub mod highscores;
pub mod host;
pub mod persistence;
pub mod platform;
pub mod report;
pub mod settings;
pub mod sim;

pub use attempts::{AttemptEvent, AttemptPhase, AttemptState, Stage, Transition};
pub use error::{AttemptError, HostError, StorageError};
pub use game::{GameSession, SessionEvent};
pub use highscores::HighScore;
pub use host::{Delivery, MessageSink};
pub use persistence::{KeyValueStore, MemoryStore};
pub use report::ScoreReport;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Grid dimensions (cells)
    pub const GRID_WIDTH: i32 = 20;
    pub const GRID_HEIGHT: i32 = 20;

    /// Snake length at the start of every attempt
    pub const INITIAL_SNAKE_LENGTH: usize = 3;

    /// Tick interval at score 0 (ms)
    pub const BASE_TICK_MS: u32 = 150;
    /// Fastest allowed tick interval (ms)
    pub const MIN_TICK_MS: u32 = 50;

    /// Flat award per food item
    pub const POINTS_PER_FOOD: u32 = 10;

    /// Attempts in each of the practice and real phases
    pub const ATTEMPTS_PER_PHASE: u8 = 3;

    /// Side length of each square obstacle block (cells)
    pub const OBSTACLE_BLOCK_SIZE: i32 = 2;
}
