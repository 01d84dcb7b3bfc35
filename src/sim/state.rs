//! Run state types shared by the controller and its collaborators
//!
//! Everything the outside world sees (inputs in; snapshots, events and
//! session results out) is defined here as plain serializable values.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::error::SimError;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first run, waiting for a start input
    Idle,
    /// Simulation running
    Active,
    /// Run over, waiting for a frustration rating before the result is final
    AwaitingRating,
    /// Result produced, waiting for a restart
    Ended,
}

/// How frustrating the player found the run (1 = mild, 3 = severe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FrustrationRating(u8);

impl FrustrationRating {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for FrustrationRating {
    type Error = SimError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=3 => Ok(Self(value)),
            _ => Err(SimError::InvalidRating(value)),
        }
    }
}

impl From<FrustrationRating> for u8 {
    fn from(rating: FrustrationRating) -> Self {
        rating.0
    }
}

/// Decoded player input, delivered in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Jump,
    Start,
    Restart,
    Rate(FrustrationRating),
    Quit,
}

/// Discrete signals for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jump,
    Collision,
    DistractorAppear,
}

/// One completed run. Times are measured on the run clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub score: u32,
    pub started_at: Duration,
    pub ended_at: Duration,
    pub duration: Duration,
    /// `None` when the player quit before rating
    pub frustration_rating: Option<FrustrationRating>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorPose {
    pub pos: Vec2,
    pub vel_y: f32,
    pub bounds: Rect,
    pub hitbox: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub top: Rect,
    pub bottom: Rect,
    pub scored: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistractorView {
    pub visible: bool,
    pub pos: Vec2,
    pub scale: f32,
    pub bounds: Rect,
}

/// Immutable per-tick view for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub speed_multiplier: f32,
    pub actor: ActorPose,
    pub obstacles: Vec<ObstacleView>,
    pub distractor: DistractorView,
}

/// Everything one tick produced
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    pub snapshot: Snapshot,
    pub events: Vec<GameEvent>,
    /// Set on the tick a run's result becomes final
    pub session: Option<SessionResult>,
    /// A quit input was seen; the driver should exit
    pub quit: bool,
}
