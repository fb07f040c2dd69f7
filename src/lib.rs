//! # handswarm
//!
//! A hand-gesture driven particle swarm.
//!
//! A landmark model watches a camera and reports hand keypoints. The
//! tracking worker turns those into one of three gestures; the swarm reacts
//! every frame:
//!
//! | Gesture | Swarm behavior |
//! |---------|----------------|
//! | `Fist` | Particles converge onto a squircle logo and spin faster |
//! | `Open` | Particles fly outward from the center |
//! | `None` | Particles drift, bouncing off an invisible sphere |
//!
//! ## Quick Start
//!
//! ```ignore
//! use handswarm::prelude::*;
//!
//! fn main() -> Result<(), SessionError> {
//!     let mut session = Session::new(SwarmConfig::default())?
//!         .with_sink(|frame: &FrameBuffers| {
//!             // upload frame.bucket_bytes(Category::Round) etc.
//!         });
//!     session.start_tracking(my_camera_model)?;
//!     session.run_for(std::time::Duration::from_secs(30));
//!     session.teardown();
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Gestures
//!
//! [`GestureClassifier`] measures how far the fingertips reach from the
//! wrist, smooths it, and bands it into [`GestureState`]. It only reports
//! *changes*. Without a confident hand the metric relaxes to a neutral
//! value, which bands to `None`.
//!
//! ### Tracking
//!
//! Anything implementing [`LandmarkSource`] can drive the swarm. It runs on
//! its own thread via [`spawn_tracker`] and publishes into a
//! [`GesturePublisher`]; the render loop reads through a [`GestureReader`]
//! without locking.
//!
//! ### Swarm
//!
//! [`Swarm`] owns the particles and their precomputed [`ShapeField`]
//! targets. [`Swarm::step`] advances one frame and writes one
//! [`InstanceRaw`] per particle into the bucket for its [`Category`].
//!
//! ### Rendering
//!
//! Rendering is out of this crate. A [`RenderSink`] receives each finished
//! [`FrameBuffers`]; a closure works.

pub mod config;
pub mod error;
pub mod gesture;
pub mod landmarks;
pub mod particle;
pub mod session;
pub mod shape;
pub mod signal;
pub mod simulation;
pub mod sink;
pub mod spawn;
pub mod time;
pub mod tracker;
pub mod visuals;

pub use bytemuck;
pub use config::{ClassifierConfig, MotionConfig, ShapeConfig, SwarmConfig, TrackingConfig};
pub use error::{ConfigError, SessionError, TrackingError};
pub use gesture::{GestureClassifier, GestureState};
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use landmarks::{best_hand, HandDetection, HandLandmark};
pub use particle::{Category, Motif, Particle, ParticleStore};
pub use session::Session;
pub use shape::{ShapeField, ShapeStrategy};
pub use signal::{gesture_channel, GesturePublisher, GestureReader};
pub use simulation::{GroupRotation, Regime, Swarm};
pub use sink::{FrameBuffers, InstanceRaw, NullSink, RenderSink};
pub use spawn::SpawnContext;
pub use time::{FrameClock, FrameTime};
pub use tracker::{spawn_tracker, LandmarkSource, ScriptedSource, Tracker, TrackerStatus};
pub use visuals::{BucketStyle, Palette};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use handswarm::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SwarmConfig;
    pub use crate::error::{ConfigError, SessionError, TrackingError};
    pub use crate::gesture::{GestureClassifier, GestureState};
    pub use crate::landmarks::HandDetection;
    pub use crate::particle::Category;
    pub use crate::session::Session;
    pub use crate::simulation::Swarm;
    pub use crate::sink::{FrameBuffers, RenderSink};
    pub use crate::time::FrameTime;
    pub use crate::tracker::{LandmarkSource, ScriptedSource};
    pub use crate::{Mat4, Vec3};
}
