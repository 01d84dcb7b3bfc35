//! Clocks feeding the tick loop

use std::time::{Duration, Instant};

use crate::consts::MAX_FRAME_DELTA_SECS;

/// Monotonic time source for the run controller
pub trait Clock {
    /// Time since the clock was created
    fn elapsed_since_start(&self) -> Duration;

    /// Advance to the next tick and return the delta since the previous one
    fn tick(&mut self) -> Duration;
}

/// Deterministic clock that advances a fixed step per tick
#[derive(Debug, Clone)]
pub struct FixedClock {
    step: Duration,
    elapsed: Duration,
}

impl FixedClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            elapsed: Duration::ZERO,
        }
    }

    /// Step of one frame at `fps`
    pub fn at_fps(fps: f32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / fps as f64))
    }
}

impl Clock for FixedClock {
    fn elapsed_since_start(&self) -> Duration {
        self.elapsed
    }

    fn tick(&mut self) -> Duration {
        self.elapsed += self.step;
        self.step
    }
}

/// Wall-clock time; deltas are capped so a stall doesn't become one giant step
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
    last: Instant,
    max_delta: Duration,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            max_delta: Duration::from_secs_f32(MAX_FRAME_DELTA_SECS),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed_since_start(&self) -> Duration {
        self.last.duration_since(self.start)
    }

    fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        dt.min(self.max_delta)
    }
}
