//! Per-frame swarm simulation.
//!
//! [`Swarm::step`] advances every particle by one rendered frame under the
//! current gesture and rewrites the render buffers in place. The gesture is
//! re-read every frame, so a change applies to all particles on the next
//! step.
//!
//! # Regimes
//!
//! | Gesture | Regime | Per-frame motion |
//! |---------|--------|------------------|
//! | `Fist` | [`Regime::Assemble`] | Lerp toward the particle's shape target |
//! | `Open` | [`Regime::Disperse`] | Move outward along the particle's own direction |
//! | `None` | [`Regime::Idle`] | Drift by stored velocity, reflect off a spherical boundary |
//!
//! Per-frame constants are tuned for `reference_hz`. A step converts its
//! delta time into `k` reference frames (clamped to `0.01..=max_catch_up`,
//! with a missing delta counted as one frame): linear moves scale by `k` and
//! lerps use `1 - (1 - f)^k`, so the motion looks the same at any frame rate
//! and every step makes progress.
//!
//! The step cannot fail. Degenerate numbers are replaced, never propagated.

use glam::{EulerRot, Mat4, Quat, Vec3};
use std::f32::consts::TAU;

use crate::config::{MotionConfig, SwarmConfig};
use crate::error::ConfigError;
use crate::gesture::GestureState;
use crate::particle::{Category, Particle, ParticleStore};
use crate::shape::ShapeField;
use crate::sink::{FrameBuffers, InstanceRaw};
use crate::spawn::SpawnContext;
use crate::time::FrameTime;
use crate::visuals::Palette;

/// Motion behavior selected by the gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Idle,
    Disperse,
    Assemble,
}

impl From<GestureState> for Regime {
    fn from(gesture: GestureState) -> Self {
        match gesture {
            GestureState::None => Regime::Idle,
            GestureState::Open => Regime::Disperse,
            GestureState::Fist => Regime::Assemble,
        }
    }
}

/// Whole-swarm rotation, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroupRotation {
    /// Continuous spin about the view axis, wrapped to `[0, 2π)`.
    pub z: f32,
    /// Wobble about the vertical axis.
    pub y: f32,
}

impl GroupRotation {
    pub fn transform(&self) -> Mat4 {
        Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, 0.0, self.y, self.z))
    }
}

/// Values reused across every particle of every frame.
#[derive(Debug, Clone)]
struct Scratch {
    /// Source of fallback directions.
    rng: SpawnContext,
    /// Instance tumble angle; advances per particle written.
    tumble: f32,
}

/// The particle swarm: store, targets, group state and render buffers.
pub struct Swarm {
    motion: MotionConfig,
    store: ParticleStore,
    field: ShapeField,
    group: GroupRotation,
    scratch: Scratch,
    frame: FrameBuffers,
}

impl Swarm {
    /// Spawn particles and generate their targets from a config.
    pub fn new(config: &SwarmConfig) -> Self {
        let store = ParticleStore::spawn(&config.shape, &Palette::default());
        let field = ShapeField::generate(&config.shape, &store.motifs());
        Self::assemble_parts(config.motion.clone(), store, field, config.shape.seed)
    }

    /// Build from an explicit store and field.
    ///
    /// Fails if the field does not have exactly one target per particle.
    pub fn from_parts(
        motion: MotionConfig,
        store: ParticleStore,
        field: ShapeField,
    ) -> Result<Self, ConfigError> {
        if store.len() != field.len() {
            return Err(ConfigError::Invalid(format!(
                "shape field has {} targets for {} particles",
                field.len(),
                store.len()
            )));
        }
        Ok(Self::assemble_parts(motion, store, field, Some(0)))
    }

    fn assemble_parts(
        motion: MotionConfig,
        store: ParticleStore,
        field: ShapeField,
        seed: Option<u64>,
    ) -> Self {
        let round = store.count(Category::Round);
        let angular = store.count(Category::Angular);
        log::info!(
            "Initialized {} particles ({} round, {} angular)",
            store.len(),
            round,
            angular
        );
        Self {
            motion,
            frame: FrameBuffers::with_capacity(round, angular),
            store,
            field,
            group: GroupRotation::default(),
            scratch: Scratch {
                rng: SpawnContext::new(seed.map(|s| s.wrapping_add(1))),
                tumble: 0.0,
            },
        }
    }

    /// Advance one rendered frame and return the refreshed render buffers.
    pub fn step(&mut self, gesture: GestureState, time: FrameTime) -> &FrameBuffers {
        let k = self.frame_multiple(time.delta);
        let regime = Regime::from(gesture);
        let m = &self.motion;

        // Group spin and wobble
        let spin = if regime == Regime::Assemble { m.assemble_spin } else { m.idle_spin };
        self.group.z = (self.group.z + spin * k).rem_euclid(TAU);
        let wobble_target = if regime == Regime::Assemble {
            (time.elapsed * m.wobble_rate).sin() * m.wobble_amplitude
        } else {
            0.0
        };
        self.group.y += (wobble_target - self.group.y) * blend(m.wobble_blend, k);
        if !self.group.y.is_finite() {
            self.group.y = 0.0;
        }

        let assemble = blend(m.assemble_factor, k);
        let pullback = m.boundary_pullback.powf(k);
        let boundary_sq = m.boundary_sq();
        let targets = self.field.as_slice();

        // One running index per bucket, reset every frame.
        let mut counters = [0usize; 2];

        for (i, p) in self.store.as_mut_slice().iter_mut().enumerate() {
            let target = targets[i];
            match regime {
                Regime::Assemble => p.position += (target - p.position) * assemble,
                Regime::Disperse => {
                    let dir = p
                        .position
                        .try_normalize()
                        .unwrap_or_else(|| self.scratch.rng.random_direction());
                    p.position += dir * (m.disperse_step * k);
                }
                Regime::Idle => {
                    p.position += p.velocity * k;
                    if p.position.length_squared() > boundary_sq {
                        p.position *= pullback;
                        p.velocity = -p.velocity;
                    }
                }
            }
            sanitize(p, target, &mut self.scratch.rng);

            let instance = render_instance(p, regime, time.elapsed, m, &mut self.scratch);
            let bucket = p.category.bucket();
            self.frame.write(p.category, counters[bucket], instance);
            counters[bucket] += 1;
        }

        self.frame.group_transform = self.group.transform();
        self.frame.gesture = gesture;
        self.frame.time = time.elapsed;
        &self.frame
    }

    /// Reference frames covered by `delta` seconds.
    ///
    /// A frame always advances: a zero or non-finite delta counts as one
    /// reference frame, and tiny deltas are floored at `MIN_FRAME_MULTIPLE`.
    fn frame_multiple(&self, delta: f32) -> f32 {
        let k = delta * self.motion.reference_hz;
        if k.is_finite() && k > 0.0 {
            k.clamp(MIN_FRAME_MULTIPLE, self.motion.max_catch_up.max(MIN_FRAME_MULTIPLE))
        } else {
            1.0
        }
    }

    /// Mean distance from each particle to its shape target.
    pub fn mean_target_distance(&self) -> f32 {
        if self.store.is_empty() {
            return 0.0;
        }
        let total: f32 = self
            .store
            .iter()
            .zip(self.field.as_slice())
            .map(|(p, t)| p.position.distance(*t))
            .sum();
        total / self.store.len() as f32
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.store
    }

    pub fn field(&self) -> &ShapeField {
        &self.field
    }

    /// Render buffers from the most recent step.
    pub fn frame(&self) -> &FrameBuffers {
        &self.frame
    }

    pub fn group_rotation(&self) -> GroupRotation {
        self.group
    }

    pub fn motion(&self) -> &MotionConfig {
        &self.motion
    }
}

/// Smallest fraction of a reference frame one step advances.
const MIN_FRAME_MULTIPLE: f32 = 0.01;

/// Per-step lerp weight for a per-frame factor `f` over `k` frames.
#[inline]
fn blend(f: f32, k: f32) -> f32 {
    1.0 - (1.0 - f).powf(k)
}

/// Replace non-finite state with something that keeps the frame drawable.
fn sanitize(p: &mut Particle, target: Vec3, rng: &mut SpawnContext) {
    if !p.position.is_finite() {
        p.position = target;
    }
    if !p.velocity.is_finite() {
        p.velocity = rng.random_direction() * 0.01;
    }
}

/// Transform and colour for one particle. Offsets here are visual only and
/// never written back to the particle.
fn render_instance(
    p: &Particle,
    regime: Regime,
    t: f32,
    m: &MotionConfig,
    scratch: &mut Scratch,
) -> InstanceRaw {
    let mut position = p.position;
    let mut scale = p.scale;
    match regime {
        Regime::Assemble => {
            let phase = t * 2.0 + p.phase;
            position += Vec3::new(phase.sin(), (phase * 1.3).cos(), 0.0) * m.shimmer_amplitude;
            scale *= 1.0 + (t * 3.0 + p.phase).sin() * m.pulse_amplitude;
        }
        Regime::Idle if m.drift_amplitude > 0.0 => {
            let phase = t * 0.5 + p.phase;
            let wander = Vec3::new(phase.sin(), (phase * 0.8).cos(), (phase * 0.6).sin());
            position += wander * m.drift_amplitude;
        }
        _ => {}
    }
    if !position.is_finite() {
        position = p.position;
    }

    scratch.tumble = (scratch.tumble + m.tumble_step).rem_euclid(TAU);
    let rotation = Quat::from_euler(EulerRot::XYZ, scratch.tumble, scratch.tumble, 0.0);
    let scale = Vec3::splat(scale.max(0.0));
    let transform = Mat4::from_scale_rotation_translation(scale, rotation, position);
    InstanceRaw::new(transform, p.color)
}
