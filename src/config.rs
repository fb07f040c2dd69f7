//! Tunable constants for the classifier, shape field, and motion regimes.
//!
//! Every struct has a `Default` reproducing the reference look, and the
//! whole tree round-trips through JSON so a session can be tuned without
//! recompiling:
//!
//! ```ignore
//! let config = SwarmConfig::load("swarm.json")?;
//! config.save("swarm.backup.json")?;
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::shape::ShapeStrategy;

/// Gesture classifier constants.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Hand confidence must be strictly above this to be used.
    pub min_hand_confidence: f32,
    /// EMA weight of the raw openness metric.
    pub smoothing: f32,
    /// Value the metric relaxes toward while no hand is seen.
    pub neutral_baseline: f32,
    /// EMA weight used on the no-hand decay path.
    pub decay: f32,
    /// Smoothed metric below this is a fist.
    pub fist_below: f32,
    /// Smoothed metric above this is an open hand.
    pub open_above: f32,
    /// Starting value of the smoothed metric.
    pub initial_metric: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_hand_confidence: 0.9,
            smoothing: 0.2,
            neutral_baseline: 0.3,
            decay: 0.1,
            fist_below: 0.20,
            open_above: 0.38,
            initial_metric: 0.3,
        }
    }
}

/// Particle population and shape field constants.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShapeConfig {
    /// Total number of particles.
    pub particle_count: usize,
    /// The first `outer_count` particles form the outer ring; the rest the inner motif.
    pub outer_count: usize,
    /// Probability that a particle is `Round` rather than `Angular`.
    pub round_fraction: f32,
    /// Which target placement rule to use.
    pub strategy: ShapeStrategy,
    /// Superellipse exponent of the ring outline.
    pub exponent: f32,
    /// Rotation of the outline in radians.
    pub rotation: f32,
    pub outer_radius: f32,
    pub outer_thickness: f32,
    pub inner_radius: f32,
    pub inner_thickness: f32,
    /// Full width of the random z offset.
    pub depth_jitter: f32,
    /// Attempts per point for rejection sampling before falling back.
    pub max_attempts: u32,
    /// Seed for target jitter. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    /// Smallest base scale of a particle.
    pub min_scale: f32,
    /// Largest base scale of a particle.
    pub max_scale: f32,
    /// Radius of the initial scattered cloud.
    pub spawn_radius: f32,
    /// Idle drift speed range, per reference frame.
    pub min_drift: f32,
    pub max_drift: f32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            particle_count: 6000,
            outer_count: 4500,
            round_fraction: 0.7,
            strategy: ShapeStrategy::Parametric,
            exponent: 3.8,
            rotation: std::f32::consts::FRAC_PI_4,
            outer_radius: 2.3,
            outer_thickness: 0.22,
            inner_radius: 1.0,
            inner_thickness: 0.12,
            depth_jitter: 0.12,
            max_attempts: 64,
            seed: None,
            min_scale: 0.035,
            max_scale: 0.075,
            spawn_radius: 20.0,
            min_drift: 0.01,
            max_drift: 0.03,
        }
    }
}

/// Per-regime motion constants, expressed per reference frame.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// Frame rate the per-frame constants are tuned for.
    pub reference_hz: f32,
    /// Fraction of the remaining distance covered per frame while assembling.
    pub assemble_factor: f32,
    /// Outward distance travelled per frame while dispersing.
    pub disperse_step: f32,
    /// Idle particles farther than this from the origin are reflected.
    pub boundary_radius: f32,
    /// Position scale applied when a particle crosses the boundary.
    pub boundary_pullback: f32,
    /// Group z rotation per frame while assembling.
    pub assemble_spin: f32,
    /// Group z rotation per frame otherwise.
    pub idle_spin: f32,
    /// Peak group y rotation while assembling.
    pub wobble_amplitude: f32,
    /// Angular frequency of the wobble, rad/s.
    pub wobble_rate: f32,
    /// Blend factor of the group y rotation toward its target.
    pub wobble_blend: f32,
    /// Instance tumble advance per particle written.
    pub tumble_step: f32,
    /// Render-only oscillation amplitude while assembling.
    pub shimmer_amplitude: f32,
    /// Render-only scale pulse while assembling, as a fraction of base scale.
    pub pulse_amplitude: f32,
    /// Render-only low-frequency drift amplitude while idle.
    pub drift_amplitude: f32,
    /// Largest number of reference frames one step may advance.
    pub max_catch_up: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reference_hz: 60.0,
            assemble_factor: 0.18,
            disperse_step: 0.7,
            boundary_radius: 32.0,
            boundary_pullback: 0.9,
            assemble_spin: 0.025,
            idle_spin: 0.006,
            wobble_amplitude: 0.25,
            wobble_rate: 0.4,
            wobble_blend: 0.06,
            tumble_step: 0.03,
            shimmer_amplitude: 0.015,
            pulse_amplitude: 0.1,
            drift_amplitude: 0.0,
            max_catch_up: 4.0,
        }
    }
}

impl MotionConfig {
    /// Squared idle boundary radius.
    #[inline]
    pub fn boundary_sq(&self) -> f32 {
        self.boundary_radius * self.boundary_radius
    }
}

/// Tracking worker pacing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackingConfig {
    /// Upper bound on landmark requests per second. 0 = as fast as the source answers.
    pub tick_hz: f32,
    /// Detections considered per request, in the source's ranking order.
    pub max_hands: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            tick_hz: 30.0,
            max_hands: 1,
        }
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwarmConfig {
    pub classifier: ClassifierConfig,
    pub shape: ShapeConfig,
    pub motion: MotionConfig,
    pub tracking: TrackingConfig,
    /// Render loop pacing in frames per second. 0 = unpaced.
    pub target_fps: f32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            shape: ShapeConfig::default(),
            motion: MotionConfig::default(),
            tracking: TrackingConfig::default(),
            target_fps: 60.0,
        }
    }
}

impl SwarmConfig {
    /// Save the config to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a config from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref())?;
        let config: SwarmConfig = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded swarm config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Check that every value is in a range the engine can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.classifier;
        if c.fist_below >= c.open_above {
            return Err(ConfigError::Invalid(format!(
                "fist_below ({}) must be lower than open_above ({})",
                c.fist_below, c.open_above
            )));
        }
        check_unit("classifier.smoothing", c.smoothing)?;
        check_unit("classifier.decay", c.decay)?;

        let s = &self.shape;
        if s.particle_count == 0 {
            return Err(ConfigError::Invalid("particle_count must be positive".into()));
        }
        if s.outer_count > s.particle_count {
            return Err(ConfigError::Invalid(format!(
                "outer_count ({}) exceeds particle_count ({})",
                s.outer_count, s.particle_count
            )));
        }
        if !(0.0..=1.0).contains(&s.round_fraction) {
            return Err(ConfigError::Invalid("round_fraction must be within [0, 1]".into()));
        }
        if s.exponent <= 0.0 {
            return Err(ConfigError::Invalid("shape exponent must be positive".into()));
        }
        if s.min_scale > s.max_scale || s.min_drift > s.max_drift {
            return Err(ConfigError::Invalid("scale and drift ranges must be ordered".into()));
        }

        let m = &self.motion;
        check_unit("motion.assemble_factor", m.assemble_factor)?;
        check_unit("motion.boundary_pullback", m.boundary_pullback)?;
        if m.reference_hz <= 0.0 || m.boundary_radius <= 0.0 || m.max_catch_up <= 0.0 {
            return Err(ConfigError::Invalid(
                "reference_hz, boundary_radius and max_catch_up must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn check_unit(name: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{} must be within (0, 1], got {}", name, value)))
    }
}
