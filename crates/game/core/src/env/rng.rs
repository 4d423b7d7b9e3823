//! RNG seam for combat rolls.
//!
//! Crit rolls, gold rolls, encounter composition and loot all draw from an
//! [`RngOracle`]. Combat is not replayable, so production code uses
//! [`LiveRng`] seeded from OS entropy; tests substitute scripted sources.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RngOracle {
    /// Uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[min, max]` inclusive.
    fn range(&mut self, min: u64, max: u64) -> u64;

    /// Bernoulli trial with success probability `probability`.
    fn chance(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.next_f64() < probability
    }

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&mut self) -> u32 {
        self.range(1, 100) as u32
    }

    /// Uniform index into a non-empty collection of `len` elements.
    fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.range(0, len as u64 - 1) as usize
    }
}

/// Entropy-seeded generator used outside tests.
#[derive(Clone, Debug)]
pub struct LiveRng {
    inner: StdRng,
}

impl LiveRng {
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for LiveRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RngOracle for LiveRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.r#gen::<f64>()
    }

    fn range(&mut self, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        self.inner.gen_range(min..=max)
    }
}
