//! Particle state and the store that owns it.
//!
//! Particles are created once, mutated every frame by the simulation step,
//! and never destroyed. They do not interact with each other.

use crate::config::ShapeConfig;
use crate::spawn::SpawnContext;
use crate::visuals::Palette;
use crate::Vec3;

/// Geometry/material bucket a particle renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Low-poly sphere instance.
    Round,
    /// Cube instance.
    Angular,
}

impl Category {
    /// Both categories, in bucket order.
    pub const ALL: [Category; 2] = [Category::Round, Category::Angular];

    /// Bucket index in [`FrameBuffers`](crate::sink::FrameBuffers).
    #[inline]
    pub fn bucket(&self) -> usize {
        match self {
            Category::Round => 0,
            Category::Angular => 1,
        }
    }
}

/// Which part of the silhouette a particle assembles into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motif {
    /// Dominant outer ring.
    Outer,
    /// Thinner inner accent ring.
    Inner,
}

/// One swarm member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    /// Idle drift per reference frame.
    pub velocity: Vec3,
    /// Base render scale.
    pub scale: f32,
    pub category: Category,
    pub motif: Motif,
    /// RGB, fixed at creation.
    pub color: Vec3,
    /// Desynchronizes render-only oscillation between particles.
    pub phase: f32,
}

/// Exclusive owner of all particle state.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    round_count: usize,
}

impl ParticleStore {
    /// Scatter `config.particle_count` particles through a cloud around the origin.
    ///
    /// The first `outer_count` indices belong to the outer ring, the rest to
    /// the inner motif. Each particle is `Round` with probability
    /// `round_fraction`.
    pub fn spawn(config: &ShapeConfig, palette: &Palette) -> Self {
        let mut ctx = SpawnContext::new(config.seed);
        let particles: Vec<Particle> = (0..config.particle_count)
            .map(|i| {
                let motif = if i < config.outer_count { Motif::Outer } else { Motif::Inner };
                let position = ctx.random_in_shell(config.spawn_radius);
                let speed = ctx.random_range(config.min_drift, config.max_drift);
                let velocity = ctx.random_direction() * speed;
                let scale = ctx.random_range(config.min_scale, config.max_scale);
                let category = if ctx.chance(config.round_fraction) {
                    Category::Round
                } else {
                    Category::Angular
                };
                Particle {
                    position,
                    velocity,
                    scale,
                    category,
                    motif,
                    color: palette.color_for(i, motif),
                    phase: ctx.random_range(0.0, std::f32::consts::TAU),
                }
            })
            .collect();
        Self::from_particles(particles)
    }

    /// Wrap an explicit particle list.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        let round_count = particles.iter().filter(|p| p.category == Category::Round).count();
        Self { particles, round_count }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of particles in a bucket. Fixed for the session.
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Round => self.round_count,
            Category::Angular => self.particles.len() - self.round_count,
        }
    }

    /// Motif of every particle, by index.
    pub fn motifs(&self) -> Vec<Motif> {
        self.particles.iter().map(|p| p.motif).collect()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    /// Mutable access for the simulation step.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}
