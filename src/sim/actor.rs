//! The falling actor
//!
//! Gravity-driven vertical motion with a jump impulse. The hitbox is a fixed
//! inset of the sprite bounds so grazing contact is forgiven. Nothing here
//! clamps to the field; leaving it is detected by the run controller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Sprite center
    pub pos: Vec2,
    /// Vertical velocity (px/frame, positive is down)
    pub vel_y: f32,
    gravity: f32,
    jump_impulse: f32,
    size: Vec2,
    hitbox_inset: Vec2,
    /// Recomputed from `pos` on every advance
    hitbox: Rect,
}

impl Actor {
    /// New actor at rest, vertically centered in the field
    pub fn new(tuning: &Tuning) -> Self {
        let pos = Vec2::new(tuning.actor_x, tuning.field_height / 2.0);
        let mut actor = Self {
            pos,
            vel_y: 0.0,
            gravity: tuning.gravity,
            jump_impulse: tuning.jump_impulse,
            size: tuning.actor_size,
            hitbox_inset: tuning.hitbox_inset,
            hitbox: Rect::from_center_size(pos, tuning.actor_size),
        };
        actor.refresh_hitbox();
        actor
    }

    /// Accelerate downward by `gravity * dt`
    pub fn apply_gravity(&mut self, dt: f32) {
        self.vel_y += self.gravity * dt;
    }

    /// Replace the current velocity with the jump impulse
    pub fn apply_impulse(&mut self) {
        self.vel_y = self.jump_impulse;
    }

    /// Integrate position and re-center the hitbox
    pub fn advance(&mut self, dt: f32) {
        self.pos.y += self.vel_y * dt;
        self.refresh_hitbox();
    }

    /// One frame of motion: gravity then integration
    pub fn update(&mut self, dt: f32) {
        self.apply_gravity(dt);
        self.advance(dt);
    }

    /// Sprite rectangle
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.pos, self.size)
    }

    /// Collision rectangle (sprite bounds shrunk by the inset)
    pub fn hitbox(&self) -> Rect {
        self.hitbox
    }

    /// X an obstacle's trailing edge must pass to count as cleared
    pub fn scoring_line(&self) -> f32 {
        self.bounds().left()
    }

    /// True once the hitbox touches the ceiling or the floor
    pub fn out_of_field(&self, field_height: f32) -> bool {
        self.hitbox.top() <= 0.0 || self.hitbox.bottom() >= field_height
    }

    fn refresh_hitbox(&mut self) {
        self.hitbox = self.bounds().inset(self.hitbox_inset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn actor_at(y: f32) -> Actor {
        let mut actor = Actor::new(&Tuning::default());
        actor.pos.y = y;
        actor.refresh_hitbox();
        actor
    }

    #[test]
    fn test_one_gravity_frame() {
        let mut actor = actor_at(200.0);
        actor.update(1.0);
        assert_eq!(actor.vel_y, 0.25);
        assert_eq!(actor.pos.y, 200.25);
    }

    #[test]
    fn test_impulse_overrides_velocity() {
        let mut actor = actor_at(200.0);
        actor.vel_y = 12.0;
        actor.apply_impulse();
        assert_eq!(actor.vel_y, -5.0);
    }

    #[test]
    fn test_hitbox_tracks_position() {
        let mut actor = actor_at(200.0);
        actor.vel_y = 10.0;
        actor.advance(1.0);
        let hit = actor.hitbox();
        assert_eq!(hit.center(), actor.pos);
        assert!(hit.width() < actor.bounds().width());
        assert!(hit.height() < actor.bounds().height());
    }

    #[test]
    fn test_out_of_field() {
        let height = 400.0;
        assert!(!actor_at(200.0).out_of_field(height));
        assert!(actor_at(5.0).out_of_field(height));
        assert!(actor_at(398.0).out_of_field(height));
    }

    proptest! {
        #[test]
        fn prop_gravity_adds_exactly(v in -50.0f32..50.0, dt in 0.001f32..4.0) {
            let mut actor = actor_at(200.0);
            actor.vel_y = v;
            actor.apply_gravity(dt);
            prop_assert_eq!(actor.vel_y, v + 0.25 * dt);
        }

        #[test]
        fn prop_impulse_ignores_prior_velocity(v in -100.0f32..100.0) {
            let mut actor = actor_at(200.0);
            actor.vel_y = v;
            actor.apply_impulse();
            prop_assert_eq!(actor.vel_y, -5.0);
        }
    }
}
