//! Seeded random helpers for particle and target placement.
//!
//! Everything random in the swarm (initial cloud, target jitter, fallback
//! directions) draws from a [`SpawnContext`]. Given a seed, the output is
//! reproducible; without one, each run differs.

use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Random source with helpers for common placement patterns.
///
/// ```ignore
/// let mut ctx = SpawnContext::new(Some(42));
/// let position = ctx.random_direction() * ctx.random_range(0.0, 20.0);
/// let z = ctx.jitter(0.12);
/// ```
#[derive(Debug, Clone)]
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context from a fixed seed, or from the clock when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// True with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.random() < p
    }

    /// Symmetric jitter in `[-width/2, width/2)`.
    #[inline]
    pub fn jitter(&mut self, width: f32) -> f32 {
        (self.random() - 0.5) * width
    }

    // ========== Direction helpers ==========

    /// Random unit vector, uniformly distributed on the unit sphere.
    pub fn random_direction(&mut self) -> Vec3 {
        let u = self.rng.gen_range(-1.0f32..1.0);
        let theta = self.rng.gen_range(0.0..TAU);
        let r = (1.0 - u * u).max(0.0).sqrt();
        Vec3::new(r * theta.cos(), r * theta.sin(), u)
    }

    /// Random point at a uniformly random distance up to `radius` along a
    /// random direction.
    ///
    /// Denser toward the centre than a uniform-volume sample.
    pub fn random_in_shell(&mut self, radius: f32) -> Vec3 {
        self.random_direction() * self.random_range(0.0, radius)
    }

    /// Random point in the axis-aligned square `[-half, half)²` at z = 0.
    pub fn random_in_square(&mut self, half: f32) -> (f32, f32) {
        (self.random_range(-half, half), self.random_range(-half, half))
    }
}
