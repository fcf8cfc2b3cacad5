//! Random sources for procedural generation
//!
//! Generation only sees the [`RandomSource`] trait, so a seeded source can
//! stand in for entropy when a run has to be reproduced.

use crate::foundation::math::{constants, Quat, Quaternion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed scalars and orientations
pub trait RandomSource {
    /// Uniform integer in `[low, high)`; returns `low` when the range is empty
    fn int_range(&mut self, low: i32, high: i32) -> i32;

    /// Uniform float in `[low, high]`; returns `low` when `high < low`
    fn float_range(&mut self, low: f32, high: f32) -> f32;

    /// Orientation drawn uniformly over all rotations
    fn random_rotation(&mut self) -> Quat;
}

/// [`RandomSource`] backed by a seedable standard generator
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
    seed: Option<u64>,
}

impl SeededRandom {
    /// Create a deterministic source from a seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a source seeded from operating system entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Seed this source was created with, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn int_range(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    fn float_range(&mut self, low: f32, high: f32) -> f32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    fn random_rotation(&mut self) -> Quat {
        let u1: f32 = self.rng.gen();
        let u2: f32 = self.rng.gen();
        let u3: f32 = self.rng.gen();
        uniform_rotation(u1, u2, u3)
    }
}

/// Map three uniform samples in `[0, 1)` to a uniformly distributed rotation
///
/// Shoemake's subgroup algorithm; the result is always a unit quaternion.
pub fn uniform_rotation(u1: f32, u2: f32, u3: f32) -> Quat {
    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();
    let (sin2, cos2) = (constants::TAU * u2).sin_cos();
    let (sin3, cos3) = (constants::TAU * u3).sin_cos();
    Quat::new_normalize(Quaternion::new(b * cos3, a * sin2, a * cos2, b * sin3))
}
