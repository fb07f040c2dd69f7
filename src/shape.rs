//! Shape field: the assembled silhouette particles converge to.
//!
//! The silhouette is a rotated superellipse ("squircle") ring with a
//! smaller, thinner ring inside it. Each particle index gets exactly one
//! target, computed once at startup and never changed.
//!
//! # Strategies
//!
//! | Strategy | Placement | Cost |
//! |----------|-----------|------|
//! | [`ShapeStrategy::Parametric`] | Even angular walk along the outline, radial jitter | Fixed |
//! | [`ShapeStrategy::Rejection`] | Random points kept inside a superellipse annulus | Bounded |
//!
//! Both honor the same motif radii and thicknesses, so the outlines look
//! alike; the distributions differ in detail.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::ops::Index;

use crate::config::ShapeConfig;
use crate::particle::Motif;
use crate::spawn::SpawnContext;
use crate::Vec3;

/// Target placement rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeStrategy {
    /// Walk the outline at uniform angle steps per motif.
    #[default]
    Parametric,
    /// Sample the bounding box and keep points inside the motif's band.
    Rejection,
}

/// Immutable per-index assembly targets.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeField {
    targets: Vec<Vec3>,
}

impl ShapeField {
    /// Generate one target per entry of `motifs`.
    ///
    /// Same config (including `seed`) and same motifs give the same field.
    pub fn generate(config: &ShapeConfig, motifs: &[Motif]) -> Self {
        let mut ctx = SpawnContext::new(config.seed.map(|s| s ^ 0x5eed_f1e1d));
        let outer = motifs.iter().filter(|m| **m == Motif::Outer).count();
        let inner = motifs.len() - outer;
        let (outer_total, inner_total) = (outer.max(1), inner.max(1));

        let mut outer_rank = 0usize;
        let mut inner_rank = 0usize;
        let targets = motifs
            .iter()
            .map(|&motif| {
                // Position of this index within its own motif, in [0, 1).
                let progress = match motif {
                    Motif::Outer => {
                        outer_rank += 1;
                        (outer_rank - 1) as f32 / outer_total as f32
                    }
                    Motif::Inner => {
                        inner_rank += 1;
                        (inner_rank - 1) as f32 / inner_total as f32
                    }
                };
                let place = match config.strategy {
                    ShapeStrategy::Parametric => parametric_point,
                    ShapeStrategy::Rejection => rejection_point,
                };
                place(config, motif, progress, &mut ctx)
            })
            .collect();

        Self { targets }
    }

    /// Field with explicit targets, one per particle index.
    pub fn from_targets(targets: Vec<Vec3>) -> Self {
        Self { targets }
    }

    /// Number of targets (equals the particle count).
    #[inline]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Target for particle `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.targets.get(index).copied()
    }

    pub fn as_slice(&self) -> &[Vec3] {
        &self.targets
    }
}

impl Index<usize> for ShapeField {
    type Output = Vec3;

    fn index(&self, index: usize) -> &Vec3 {
        &self.targets[index]
    }
}

fn motif_band(config: &ShapeConfig, motif: Motif) -> (f32, f32) {
    match motif {
        Motif::Outer => (config.outer_radius, config.outer_thickness),
        Motif::Inner => (config.inner_radius, config.inner_thickness),
    }
}

/// `sign(c) * |c|^(2/e)`: maps a unit circle onto a superellipse of exponent `e`.
#[inline]
fn squircle(c: f32, exponent: f32) -> f32 {
    c.signum() * c.abs().powf(2.0 / exponent)
}

#[inline]
fn rotate(x: f32, y: f32, angle: f32) -> (f32, f32) {
    let (s, c) = angle.sin_cos();
    (x * c - y * s, x * s + y * c)
}

fn parametric_point(
    config: &ShapeConfig,
    motif: Motif,
    progress: f32,
    ctx: &mut SpawnContext,
) -> Vec3 {
    let (radius, thickness) = motif_band(config, motif);
    let r = radius + ctx.jitter(thickness);
    let (sin_t, cos_t) = (progress * TAU).sin_cos();

    let raw_x = squircle(cos_t, config.exponent);
    let raw_y = squircle(sin_t, config.exponent);
    let (x, y) = rotate(raw_x, raw_y, config.rotation);

    Vec3::new(x * r, y * r, ctx.jitter(config.depth_jitter))
}

fn rejection_point(
    config: &ShapeConfig,
    motif: Motif,
    progress: f32,
    ctx: &mut SpawnContext,
) -> Vec3 {
    let (radius, thickness) = motif_band(config, motif);
    let n = config.exponent;
    let inner = (radius - thickness * 0.5).max(0.0).powf(n);
    let outer = (radius + thickness * 0.5).powf(n);
    let half = radius + thickness * 0.5;

    for _ in 0..config.max_attempts {
        let (x, y) = ctx.random_in_square(half);
        let v = x.abs().powf(n) + y.abs().powf(n);
        if v >= inner && v <= outer {
            let (x, y) = rotate(x, y, config.rotation);
            return Vec3::new(x, y, ctx.jitter(config.depth_jitter));
        }
    }

    // Out of attempts: take the deterministic outline point for this index.
    parametric_point(config, motif, progress, ctx)
}
