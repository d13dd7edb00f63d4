//! Random tie-breaking sources.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of small random offsets used to break exact ties.
pub trait Jitter {
    /// A value in `[0, upper)`. Returns 0 when `upper` is not positive.
    fn sample(&mut self, upper: f64) -> f64;
}

/// Uniform jitter backed by a `rand` generator.
pub struct RandomJitter<R = ThreadRng> {
    rng: R,
}

impl RandomJitter<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomJitter<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomJitter<StdRng> {
    /// Reproducible jitter for replaying a draw.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Jitter for RandomJitter<R> {
    fn sample(&mut self, upper: f64) -> f64 {
        if upper > 0.0 {
            self.rng.gen_range(0.0..upper)
        } else {
            0.0
        }
    }
}

/// Jitter pinned to zero, for deterministic draws.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn sample(&mut self, _upper: f64) -> f64 {
        0.0
    }
}
