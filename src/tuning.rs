//! Data-driven game balance
//!
//! Every constant the simulation reads lives here so a run can be rebalanced
//! from JSON without touching code. Motion values are per nominal frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Longest distractor schedule value accepted (one day)
pub const MAX_SCHEDULE_SECS: f32 = 86_400.0;

/// Balance parameters for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Frame rate the per-frame constants were authored against
    pub nominal_fps: f32,

    // === Actor ===
    /// Downward acceleration (px/frame²)
    pub gravity: f32,
    /// Velocity set by a jump (px/frame, negative is up)
    pub jump_impulse: f32,
    /// Horizontal center of the actor
    pub actor_x: f32,
    /// Visual sprite size
    pub actor_size: Vec2,
    /// Per-side shrink from sprite to hitbox
    pub hitbox_inset: Vec2,

    // === Obstacles ===
    pub barrier_width: f32,
    /// How far past the right edge new obstacles appear
    pub spawn_offset: f32,
    /// Leftward speed before the difficulty multiplier (px/frame)
    pub base_speed: f32,
    /// Distance the newest obstacle must clear from the right edge before another spawns
    pub spawn_clearance: f32,
    pub min_gap: u32,
    pub max_gap: u32,
    /// Time constant of the gap decay (seconds)
    pub gap_decay_secs: f32,
    /// Speed multiplier added per point scored
    pub speed_increment: f32,

    // === Distractor ===
    pub distractor_size: f32,
    pub distractor_max_scale: f32,
    /// Scale change per frame while pulsing
    pub distractor_scale_rate: f32,
    /// Candidate velocities, one picked per appearance
    pub distractor_velocities: Vec<Vec2>,
    pub distractor_initial_delay_secs: f32,
    pub distractor_mean_delay_secs: f32,
    pub distractor_delay_std_dev_secs: f32,
    pub distractor_visible_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            nominal_fps: NOMINAL_FPS,

            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            actor_x: ACTOR_X,
            actor_size: Vec2::new(ACTOR_WIDTH, ACTOR_HEIGHT),
            hitbox_inset: Vec2::new(6.0, 5.0),

            barrier_width: BARRIER_WIDTH,
            spawn_offset: 100.0,
            base_speed: BASE_SPEED,
            spawn_clearance: 100.0,
            min_gap: MIN_GAP,
            max_gap: MAX_GAP,
            gap_decay_secs: 100.0,
            speed_increment: 0.1,

            distractor_size: 48.0,
            distractor_max_scale: 2.0,
            distractor_scale_rate: 0.02,
            distractor_velocities: vec![
                Vec2::new(3.0, 2.0),
                Vec2::new(-3.0, 2.0),
                Vec2::new(3.0, -2.0),
                Vec2::new(-3.0, -2.0),
            ],
            distractor_initial_delay_secs: 5.0,
            distractor_mean_delay_secs: 12.0,
            distractor_delay_std_dev_secs: 4.0,
            distractor_visible_secs: 3.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: field {}x{}, gaps [{}, {}]",
            tuning.field_width,
            tuning.field_height,
            tuning.min_gap,
            tuning.max_gap
        );
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.field_width > 0.0 && self.field_width.is_finite())
            || !(self.field_height > 0.0 && self.field_height.is_finite())
        {
            return Err(SimError::NonPositiveField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), SimError> {
            Err(SimError::InvalidTuning { field, reason })
        };

        if self.nominal_fps <= 0.0 {
            return invalid("nominal_fps", "must be positive");
        }
        if self.min_gap == 0 {
            return invalid("min_gap", "must be positive");
        }
        if self.min_gap > self.max_gap {
            return invalid("min_gap", "exceeds max_gap");
        }
        if self.max_gap as f32 > self.field_height {
            return invalid("max_gap", "exceeds field height");
        }
        if self.actor_size.x <= 0.0 || self.actor_size.y <= 0.0 {
            return invalid("actor_size", "must be positive");
        }
        if self.hitbox_inset.x < 0.0
            || self.hitbox_inset.y < 0.0
            || self.hitbox_inset.x * 2.0 >= self.actor_size.x
            || self.hitbox_inset.y * 2.0 >= self.actor_size.y
        {
            return invalid("hitbox_inset", "must leave a non-empty hitbox");
        }
        if self.barrier_width <= 0.0 {
            return invalid("barrier_width", "must be positive");
        }
        if self.base_speed <= 0.0 {
            return invalid("base_speed", "must be positive");
        }
        if self.speed_increment < 0.0 {
            return invalid("speed_increment", "must not be negative");
        }
        if self.gap_decay_secs <= 0.0 {
            return invalid("gap_decay_secs", "must be positive");
        }
        if self.distractor_size <= 0.0 {
            return invalid("distractor_size", "must be positive");
        }
        if self.distractor_max_scale < 1.0 {
            return invalid("distractor_max_scale", "must be at least 1.0");
        }
        if self.distractor_scale_rate <= 0.0 {
            return invalid("distractor_scale_rate", "must be positive");
        }
        if self.distractor_velocities.is_empty() {
            return invalid("distractor_velocities", "must not be empty");
        }
        let schedule = [
            ("distractor_initial_delay_secs", self.distractor_initial_delay_secs),
            ("distractor_mean_delay_secs", self.distractor_mean_delay_secs),
            ("distractor_delay_std_dev_secs", self.distractor_delay_std_dev_secs),
            ("distractor_visible_secs", self.distractor_visible_secs),
        ];
        for (field, secs) in schedule {
            if !(0.0..=MAX_SCHEDULE_SECS).contains(&secs) {
                return invalid(field, "must be within [0, 86400] seconds");
            }
        }
        if self.distractor_visible_secs == 0.0 {
            return invalid("distractor_visible_secs", "must be positive");
        }
        Ok(())
    }

    /// Convert a wall-clock delta into nominal frames
    #[inline]
    pub fn frames(&self, dt: std::time::Duration) -> f32 {
        dt.as_secs_f32() * self.nominal_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_field() {
        let tuning = Tuning {
            field_height: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(SimError::NonPositiveField { .. })
        ));
    }

    #[test]
    fn test_rejects_gap_taller_than_field() {
        let tuning = Tuning {
            max_gap: 500,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(SimError::InvalidTuning { field: "max_gap", .. })
        ));
    }

    #[test]
    fn test_rejects_unbounded_distractor_schedule() {
        for secs in [1e20, f32::INFINITY, f32::NAN, -1.0] {
            let tuning = Tuning {
                distractor_mean_delay_secs: secs,
                ..Default::default()
            };
            assert!(matches!(
                tuning.validate(),
                Err(SimError::InvalidTuning {
                    field: "distractor_mean_delay_secs",
                    ..
                })
            ));
        }
        let tuning = Tuning {
            distractor_visible_secs: MAX_SCHEDULE_SECS * 2.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_field() {
        let tuning = Tuning {
            field_width: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(SimError::NonPositiveField { .. })
        ));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.5, "min_gap": 120 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.min_gap, 120);
        assert_eq!(tuning.max_gap, MAX_GAP);
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let mut tuning = Tuning::default();
        tuning.speed_increment = 0.25;
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(SimError::Parse(_))
        ));
    }

    #[test]
    fn test_frames_conversion() {
        let tuning = Tuning::default();
        let frames = tuning.frames(std::time::Duration::from_secs(1));
        assert!((frames - NOMINAL_FPS).abs() < 1e-3);
    }
}
