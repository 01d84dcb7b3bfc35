//! Obstacles and the scrolling field that owns them
//!
//! An obstacle is a top/bottom barrier pair with a vertical gap. The field
//! spawns them off the right edge on a spacing rule, scrolls them left at a
//! speed scaled by the difficulty multiplier, scores them once they are
//! behind the actor, and drops them after they leave the left edge.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::rng::RandomSource;
use crate::error::SimError;
use crate::tuning::Tuning;

/// A barrier pair with a gap the actor must fly through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Vertical center of the gap
    pub gap_center: f32,
    pub gap_size: u32,
    /// Left edge of both barriers
    pub x: f32,
    pub width: f32,
    field_height: f32,
    /// Set once, when the obstacle passes behind the actor
    pub scored: bool,
}

impl Obstacle {
    /// Create an obstacle just beyond the right edge of the field.
    ///
    /// `gap_size` must lie in `[min_gap, max_gap]`. The gap center is drawn
    /// uniformly so both barriers keep a non-negative height.
    pub fn spawn(
        id: u32,
        gap_size: u32,
        tuning: &Tuning,
        rng: &mut impl RandomSource,
    ) -> Result<Self, SimError> {
        if tuning.field_width <= 0.0 || tuning.field_height <= 0.0 {
            return Err(SimError::NonPositiveField {
                width: tuning.field_width,
                height: tuning.field_height,
            });
        }
        if gap_size < tuning.min_gap || gap_size > tuning.max_gap {
            return Err(SimError::GapOutOfRange {
                gap: gap_size,
                min: tuning.min_gap,
                max: tuning.max_gap,
            });
        }
        if gap_size as f32 > tuning.field_height {
            return Err(SimError::GapOutOfRange {
                gap: gap_size,
                min: tuning.min_gap,
                max: tuning.field_height as u32,
            });
        }
        Ok(Self::generate(id, gap_size, tuning, rng))
    }

    /// Placement without validation; callers guarantee the gap fits.
    fn generate(id: u32, gap_size: u32, tuning: &Tuning, rng: &mut impl RandomSource) -> Self {
        let half = gap_size as f32 / 2.0;
        let (lo, hi) = (half, tuning.field_height - half);
        // Whole-pixel draw; on a fractional field the interval may hold no
        // integer, so clamp back onto the real one
        let drawn = rng.uniform_int(lo.ceil() as i32, hi.floor() as i32) as f32;
        let gap_center = drawn.clamp(lo, hi.max(lo));
        Self {
            id,
            gap_center,
            gap_size,
            x: tuning.field_width + tuning.spawn_offset,
            width: tuning.barrier_width,
            field_height: tuning.field_height,
            scored: false,
        }
    }

    /// Scroll left by `base_speed * speed_multiplier * dt`
    pub fn advance(&mut self, dt: f32, base_speed: f32, speed_multiplier: f32) {
        self.x -= base_speed * speed_multiplier * dt;
    }

    pub fn top_barrier(&self) -> Rect {
        let bottom = self.gap_center - self.gap_size as f32 / 2.0;
        Rect::new(self.x, 0.0, self.width, bottom.max(0.0))
    }

    pub fn bottom_barrier(&self) -> Rect {
        let top = self.gap_center + self.gap_size as f32 / 2.0;
        Rect::new(self.x, top, self.width, (self.field_height - top).max(0.0))
    }

    /// Right edge of the barrier pair
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    /// Fully past the left boundary
    pub fn is_off_field(&self) -> bool {
        self.trailing_edge() < 0.0
    }

    pub fn check_collision(&self, bounds: &Rect) -> bool {
        self.top_barrier().intersects(bounds) || self.bottom_barrier().intersects(bounds)
    }
}

/// What happened to the field during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldTick {
    pub spawned: Option<u32>,
    pub scored: u32,
    pub removed: usize,
    pub collided: bool,
}

/// Ordered obstacles (spawn order == left-to-right) plus the difficulty multiplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
    /// Only grows during a run; reset to 1.0 on a new run
    pub speed_multiplier: f32,
    next_id: u32,
}

impl Default for ObstacleField {
    fn default() -> Self {
        Self {
            obstacles: Vec::new(),
            speed_multiplier: 1.0,
            next_id: 1,
        }
    }
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear for a new run and place the opening obstacle
    pub fn reset(&mut self, tuning: &Tuning, rng: &mut impl RandomSource) {
        self.obstacles.clear();
        self.speed_multiplier = 1.0;
        self.next_id = 1;
        self.spawn(Duration::ZERO, tuning, rng);
    }

    /// Gap size for a new obstacle: a uniform draw over the gap range,
    /// shrunk by `exp(-elapsed / tau)` and floored at `min_gap`.
    pub fn draw_gap(run_elapsed: Duration, tuning: &Tuning, rng: &mut impl RandomSource) -> u32 {
        let raw = rng.uniform_int(tuning.min_gap as i32, tuning.max_gap as i32);
        let decay = (-run_elapsed.as_secs_f32() / tuning.gap_decay_secs).exp();
        let gap = (raw as f32 * decay) as u32;
        gap.clamp(tuning.min_gap, tuning.max_gap)
    }

    /// Advance the field by `dt` frames. `actor_x` is the scoring line,
    /// `hitbox` the actor's collision rectangle. `on_score` runs once per
    /// obstacle the moment it is first scored.
    ///
    /// A zero-length step only answers the collision query.
    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        dt: f32,
        run_elapsed: Duration,
        actor_x: f32,
        hitbox: &Rect,
        tuning: &Tuning,
        rng: &mut impl RandomSource,
        mut on_score: impl FnMut(&Obstacle),
    ) -> FieldTick {
        let mut result = FieldTick::default();

        if dt > 0.0 {
            if self.should_spawn(tuning) {
                result.spawned = Some(self.spawn(run_elapsed, tuning, rng));
            }

            for obstacle in &mut self.obstacles {
                obstacle.advance(dt, tuning.base_speed, self.speed_multiplier);
            }

            for obstacle in &mut self.obstacles {
                if !obstacle.scored && obstacle.trailing_edge() < actor_x {
                    obstacle.scored = true;
                    self.speed_multiplier += tuning.speed_increment;
                    result.scored += 1;
                    log::debug!(
                        "Obstacle {} cleared, speed x{:.2}",
                        obstacle.id,
                        self.speed_multiplier
                    );
                    on_score(&*obstacle);
                }
            }

            let before = self.obstacles.len();
            self.obstacles.retain(|o| !o.is_off_field());
            result.removed = before - self.obstacles.len();
        }

        result.collided = self.collides(hitbox);
        result
    }

    pub fn collides(&self, hitbox: &Rect) -> bool {
        self.obstacles.iter().any(|o| o.check_collision(hitbox))
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Spawn when empty, or once the newest obstacle clears the threshold
    fn should_spawn(&self, tuning: &Tuning) -> bool {
        match self.obstacles.last() {
            None => true,
            Some(last) => last.trailing_edge() < tuning.field_width - tuning.spawn_clearance,
        }
    }

    fn spawn(&mut self, run_elapsed: Duration, tuning: &Tuning, rng: &mut impl RandomSource) -> u32 {
        let gap = Self::draw_gap(run_elapsed, tuning, rng);
        let id = self.next_id;
        self.next_id += 1;
        let obstacle = Obstacle::generate(id, gap, tuning, rng);
        log::debug!(
            "Spawned obstacle {} gap={} center={}",
            id,
            gap,
            obstacle.gap_center
        );
        self.obstacles.push(obstacle);
        id
    }
}
