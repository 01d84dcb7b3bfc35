//! Injectable randomness
//!
//! The simulation never touches ambient RNG state. Every draw goes through a
//! [`RandomSource`] owned by the run controller, so a seed (or a scripted
//! queue of draws) fully determines gap placement and distractor timing.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of the random draws the simulation needs
pub trait RandomSource {
    /// Uniform integer in `lo..=hi` (returns `lo` if the range is empty)
    fn uniform_int(&mut self, lo: i32, hi: i32) -> i32;

    /// Sample from a normal distribution
    fn normal(&mut self, mean: f32, std_dev: f32) -> f32;

    /// Pick one element uniformly, `None` for an empty slice
    fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let idx = self.uniform_int(0, last_index(items.len()));
        items.get(usize::try_from(idx).unwrap_or(0))
    }
}

/// Highest index drawable for a slice of `len` items, saturating at `i32::MAX`
fn last_index(len: usize) -> i32 {
    i32::try_from(len.saturating_sub(1)).unwrap_or(i32::MAX)
}

/// Seeded PCG-backed source used for real runs
#[derive(Debug, Clone)]
pub struct PcgSource {
    seed: u64,
    rng: Pcg32,
}

impl PcgSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for PcgSource {
    fn uniform_int(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    fn normal(&mut self, mean: f32, std_dev: f32) -> f32 {
        // Box-Muller; u1 in (0, 1] keeps ln finite
        let u1 = 1.0 - self.rng.random::<f32>();
        let u2 = self.rng.random::<f32>();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos();
        mean + z * std_dev
    }
}

/// Replays queued draws in order. Integer draws are clamped into the
/// requested range; once a queue runs dry it answers `lo` / `mean`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    ints: VecDeque<i32>,
    normals: VecDeque<f32>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ints(mut self, ints: impl IntoIterator<Item = i32>) -> Self {
        self.ints.extend(ints);
        self
    }

    pub fn with_normals(mut self, normals: impl IntoIterator<Item = f32>) -> Self {
        self.normals.extend(normals);
        self
    }
}

impl RandomSource for ScriptedSource {
    fn uniform_int(&mut self, lo: i32, hi: i32) -> i32 {
        match self.ints.pop_front() {
            Some(v) if hi >= lo => v.clamp(lo, hi),
            _ => lo,
        }
    }

    fn normal(&mut self, mean: f32, _std_dev: f32) -> f32 {
        self.normals.pop_front().unwrap_or(mean)
    }
}
