//! The distractor: a pulsing, bouncing visual that pops in on a random schedule
//!
//! Purely perceptual. It never feeds into scoring or collision.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::rng::RandomSource;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distractor {
    pub visible: bool,
    /// Pulses within `[1.0, max_scale]`
    pub size_factor: f32,
    growing: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Run-relative time of the last appearance (run start before the first)
    pub last_appeared_at: Duration,
    /// Most recent randomized delay threshold
    pub next_appear_delay: Duration,
}

impl Default for Distractor {
    fn default() -> Self {
        Self {
            visible: false,
            size_factor: 1.0,
            growing: true,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            last_appeared_at: Duration::ZERO,
            next_appear_delay: Duration::ZERO,
        }
    }
}

impl Distractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide and restart the schedule from run start
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Current on-screen rectangle
    pub fn bounds(&self, tuning: &Tuning) -> Rect {
        Rect::from_center_size(self.pos, Vec2::splat(tuning.distractor_size * self.size_factor))
    }

    /// Advance by `dt` frames at run-relative time `run_elapsed`.
    /// Returns true on the tick it appears.
    pub fn tick(
        &mut self,
        dt: f32,
        run_elapsed: Duration,
        tuning: &Tuning,
        rng: &mut impl RandomSource,
    ) -> bool {
        let since_appeared = run_elapsed.saturating_sub(self.last_appeared_at);

        if self.visible {
            if since_appeared >= saturating_secs(tuning.distractor_visible_secs) {
                self.visible = false;
                log::debug!("Distractor hidden at {:.2}s", run_elapsed.as_secs_f32());
                return false;
            }
            self.pulse(dt, tuning);
            self.bounce(dt, tuning);
            return false;
        }

        // Re-drawn every tick: "has enough random time passed", not a one-shot timer
        let sample = rng.normal(
            tuning.distractor_mean_delay_secs,
            tuning.distractor_delay_std_dev_secs,
        );
        self.next_appear_delay = saturating_secs(sample);
        let initial = saturating_secs(tuning.distractor_initial_delay_secs);

        if since_appeared > initial && since_appeared > self.next_appear_delay {
            self.appear(run_elapsed, tuning, rng);
            return true;
        }
        false
    }

    fn appear(&mut self, run_elapsed: Duration, tuning: &Tuning, rng: &mut impl RandomSource) {
        let half = (tuning.distractor_size / 2.0).ceil() as i32;
        let x = rng.uniform_int(half, tuning.field_width as i32 - half);
        let y = rng.uniform_int(half, tuning.field_height as i32 - half);
        self.pos = Vec2::new(x as f32, y as f32);
        self.vel = rng
            .choice(&tuning.distractor_velocities)
            .copied()
            .unwrap_or(Vec2::ZERO);
        self.size_factor = 1.0;
        self.growing = true;
        self.visible = true;
        self.last_appeared_at = run_elapsed;
        log::debug!(
            "Distractor appeared at {:.2}s ({}, {})",
            run_elapsed.as_secs_f32(),
            x,
            y
        );
    }

    /// Grow to `max_scale`, shrink back to 1.0, flipping exactly at each bound
    fn pulse(&mut self, dt: f32, tuning: &Tuning) {
        let step = tuning.distractor_scale_rate * dt;
        if self.growing {
            self.size_factor += step;
            if self.size_factor >= tuning.distractor_max_scale {
                self.size_factor = tuning.distractor_max_scale;
                self.growing = false;
            }
        } else {
            self.size_factor -= step;
            if self.size_factor <= 1.0 {
                self.size_factor = 1.0;
                self.growing = true;
            }
        }
    }

    /// Integrate and reflect off the field edges
    fn bounce(&mut self, dt: f32, tuning: &Tuning) {
        self.pos += self.vel * dt;
        let b = self.bounds(tuning);
        if (b.left() <= 0.0 && self.vel.x < 0.0)
            || (b.right() >= tuning.field_width && self.vel.x > 0.0)
        {
            self.vel.x = -self.vel.x;
        }
        if (b.top() <= 0.0 && self.vel.y < 0.0)
            || (b.bottom() >= tuning.field_height && self.vel.y > 0.0)
        {
            self.vel.y = -self.vel.y;
        }
    }
}

/// Seconds to `Duration`, flooring negatives at zero and capping overflow
fn saturating_secs(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs.max(0.0)).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{PcgSource, ScriptedSource};

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    #[test]
    fn test_hidden_before_initial_delay() {
        let t = Tuning::default();
        // Normal draws of zero would otherwise allow an immediate appearance
        let mut rng = ScriptedSource::new().with_normals(std::iter::repeat_n(0.0, 400));
        let mut d = Distractor::new();
        let fps = t.nominal_fps;
        let frames = (t.distractor_initial_delay_secs * fps) as u32;
        for i in 0..frames {
            let appeared = d.tick(1.0, secs(i as f32 / fps), &t, &mut rng);
            assert!(!appeared);
            assert!(!d.visible);
        }
        assert!(d.tick(1.0, secs(t.distractor_initial_delay_secs + 0.1), &t, &mut rng));
    }

    #[test]
    fn test_waits_for_random_threshold() {
        let t = Tuning::default();
        let mut rng = ScriptedSource::new().with_normals([20.0, 20.0, 1.0]);
        let mut d = Distractor::new();
        assert!(!d.tick(1.0, secs(10.0), &t, &mut rng));
        assert_eq!(d.next_appear_delay, secs(20.0));
        assert!(!d.tick(1.0, secs(11.0), &t, &mut rng));
        // A low draw on a later tick lets it through
        assert!(d.tick(1.0, secs(12.0), &t, &mut rng));
        assert!(d.visible);
        assert_eq!(d.last_appeared_at, secs(12.0));
        assert_eq!(d.size_factor, 1.0);
    }

    #[test]
    fn test_huge_delay_draw_keeps_it_hidden() {
        // Bypasses validation to exercise the conversion itself
        let t = Tuning {
            distractor_mean_delay_secs: 1e20,
            ..Default::default()
        };
        let mut rng = ScriptedSource::new();
        let mut d = Distractor::new();
        assert!(!d.tick(1.0, secs(60.0), &t, &mut rng));
        assert_eq!(d.next_appear_delay, Duration::MAX);
        assert!(!d.visible);
    }

    #[test]
    fn test_saturating_secs() {
        assert_eq!(saturating_secs(-3.0), Duration::ZERO);
        assert_eq!(saturating_secs(f32::NAN), Duration::ZERO);
        assert_eq!(saturating_secs(f32::INFINITY), Duration::MAX);
        assert_eq!(saturating_secs(2.5), Duration::from_millis(2500));
    }

    #[test]
    fn test_appearance_is_inside_field() {
        let t = Tuning::default();
        let mut rng = PcgSource::new(99);
        for _ in 0..50 {
            let mut d = Distractor::new();
            d.appear(secs(6.0), &t, &mut rng);
            let b = d.bounds(&t);
            assert!(b.left() >= 0.0 && b.right() <= t.field_width);
            assert!(b.top() >= 0.0 && b.bottom() <= t.field_height);
            assert!(t.distractor_velocities.contains(&d.vel));
        }
    }

    #[test]
    fn test_forced_hide_after_ceiling() {
        let t = Tuning::default();
        let mut rng = ScriptedSource::new().with_normals([0.0]);
        let mut d = Distractor::new();
        assert!(d.tick(1.0, secs(6.0), &t, &mut rng));
        d.tick(1.0, secs(6.0 + t.distractor_visible_secs - 0.1), &t, &mut rng);
        assert!(d.visible);
        d.tick(1.0, secs(6.0 + t.distractor_visible_secs), &t, &mut rng);
        assert!(!d.visible);
    }

    #[test]
    fn test_pulse_stays_in_bounds_and_flips() {
        let t = Tuning::default();
        let mut d = Distractor::new();
        d.visible = true;
        let mut prev = d.size_factor;
        let mut flips = 0;
        let mut was_growing = true;
        for _ in 0..500 {
            d.pulse(1.0, &t);
            assert!(d.size_factor >= 1.0 && d.size_factor <= t.distractor_max_scale);
            if was_growing {
                assert!(d.size_factor >= prev);
            } else {
                assert!(d.size_factor <= prev);
            }
            if d.growing != was_growing {
                flips += 1;
                let at_bound = d.size_factor == 1.0 || d.size_factor == t.distractor_max_scale;
                assert!(at_bound);
            }
            was_growing = d.growing;
            prev = d.size_factor;
        }
        assert!(flips >= 4);
    }

    #[test]
    fn test_bounces_off_edges() {
        let t = Tuning::default();
        let mut d = Distractor::new();
        d.visible = true;
        d.pos = Vec2::new(t.field_width - 25.0, 25.0);
        d.vel = Vec2::new(3.0, -3.0);
        d.bounce(1.0, &t);
        assert_eq!(d.vel, Vec2::new(-3.0, 3.0));

        for _ in 0..2000 {
            d.bounce(1.0, &t);
            let b = d.bounds(&t);
            assert!(b.left() > -10.0 && b.right() < t.field_width + 10.0);
            assert!(b.top() > -10.0 && b.bottom() < t.field_height + 10.0);
        }
    }
}
