//! Gap Runner - A side-scrolling reflex game core
//!
//! Core modules:
//! - `sim`: Deterministic run simulation (actor, obstacles, distractor, run state machine)
//! - `platform`: Clocks and the capability traits for renderer, audio and session recording
//! - `tuning`: Data-driven game balance
//! - `highscores`: Per-player session leaderboard
//! - `records`: Player registry and the persistent session log

pub mod error;
pub mod highscores;
pub mod platform;
pub mod records;
pub mod sim;
pub mod tuning;

pub use error::{RecordError, SimError};
pub use highscores::HighScores;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Frame rate the per-frame motion constants are authored against
    pub const NOMINAL_FPS: f32 = 70.0;
    /// Longest delta a real-time clock will report (avoids huge catch-up steps)
    pub const MAX_FRAME_DELTA_SECS: f32 = 0.1;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Actor defaults
    pub const GRAVITY: f32 = 0.25;
    pub const JUMP_IMPULSE: f32 = -5.0;
    pub const ACTOR_X: f32 = 100.0;
    pub const ACTOR_WIDTH: f32 = 50.0;
    pub const ACTOR_HEIGHT: f32 = 35.0;

    /// Obstacle defaults
    pub const BARRIER_WIDTH: f32 = 20.0;
    pub const BASE_SPEED: f32 = 3.0;
    pub const MIN_GAP: u32 = 100;
    pub const MAX_GAP: u32 = 300;
}
