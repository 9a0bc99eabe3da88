//! Random source consumed by the simulation
//!
//! The sim never touches OS randomness; everything flows through
//! [`RandomSource`] so a seed fully determines a run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform random floats
pub trait RandomSource {
    /// Uniform float in `[0, 1)`
    fn next(&mut self) -> f32;

    /// Uniform float in `[min, max)`; returns `min` without drawing if the range is empty
    fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.next() * (max - min)
    }

    /// Uniformly chosen element
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let idx = ((self.next() * items.len() as f32) as usize).min(items.len() - 1);
        items.get(idx)
    }
}

/// Seeded PCG generator
#[derive(Debug, Clone)]
pub struct SimRng {
    seed: u64,
    rng: Pcg32,
}

impl SimRng {
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

impl RandomSource for SimRng {
    fn next(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}
