//! Randomness capability injected into persona selection and attribute
//! synthesis.
//!
//! Production code draws from the operating system CSPRNG with no seed, so
//! generated communities are not reproducible. Tests substitute a seeded
//! source.

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

/// Source of the random draws used by community generation.
pub trait RandomSource: Send {
    /// Uniform float in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform integer in `[0, n)`. `n` must be non-zero.
    fn intn(&mut self, n: usize) -> usize;

    /// Standard normal deviate (Box-Muller).
    fn normal(&mut self) -> f64 {
        // 1 - u keeps the log argument in (0, 1].
        let u1 = 1.0 - self.uniform();
        let u2 = self.uniform();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Random permutation of `0..n` (Fisher-Yates).
    fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = self.intn(i + 1);
            perm.swap(i, j);
        }
        perm
    }
}

/// Cryptographically secure source backed by `OsRng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn uniform(&mut self) -> f64 {
        OsRng.gen::<f64>()
    }

    fn intn(&mut self, n: usize) -> usize {
        OsRng.gen_range(0..n)
    }
}

/// Deterministic source for tests and reproducible experiments.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn intn(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }
}
