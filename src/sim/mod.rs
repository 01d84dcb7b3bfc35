//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time arrives as explicit deltas, never read from the system
//! - Randomness only through an injected `RandomSource`
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering, audio or storage; those only receive emitted values

pub mod actor;
pub mod distractor;
pub mod obstacle;
pub mod rect;
pub mod rng;
pub mod state;
pub mod tick;

pub use actor::Actor;
pub use distractor::Distractor;
pub use obstacle::{FieldTick, Obstacle, ObstacleField};
pub use rect::Rect;
pub use rng::{PcgSource, RandomSource, ScriptedSource};
pub use state::{
    ActorPose, DistractorView, FrustrationRating, GameEvent, GamePhase, InputEvent, ObstacleView,
    SessionResult, Snapshot, TickOutput,
};
pub use tick::RunController;
