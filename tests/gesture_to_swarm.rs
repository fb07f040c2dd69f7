//! Integration tests across classifier, signal, tracker and swarm.
//!
//! These drive the public API the way a session does: detections go in one
//! end, particle state comes out the other.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use handswarm::config::{ClassifierConfig, ShapeConfig, SwarmConfig, TrackingConfig};
use handswarm::gesture::{GestureClassifier, GestureState};
use handswarm::landmarks::HandDetection;
use handswarm::particle::Category;
use handswarm::shape::{ShapeField, ShapeStrategy};
use handswarm::signal::gesture_channel;
use handswarm::simulation::Swarm;
use handswarm::time::FrameTime;
use handswarm::tracker::{spawn_tracker, ScriptedSource, TrackerStatus};

fn classifier_at(metric: f32) -> GestureClassifier {
    GestureClassifier::new(ClassifierConfig {
        initial_metric: metric,
        ..Default::default()
    })
}

fn small(seed: u64) -> SwarmConfig {
    SwarmConfig {
        shape: ShapeConfig {
            particle_count: 1200,
            outer_count: 900,
            seed: Some(seed),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Two seconds of ticks at `tick_hz`, fingertips closing from neutral to a fist.
fn closing_hand(tick_hz: f32) -> Vec<HandDetection> {
    let ticks = (2.0 * tick_hz) as usize;
    (0..ticks)
        .map(|i| {
            let t = i as f32 / (ticks - 1) as f32;
            HandDetection::synthetic(0.3 - 0.28 * t, 0.95)
        })
        .collect()
}

// ============================================================================
// End-to-end scenario
// ============================================================================

#[test]
fn test_closing_hand_assembles_swarm() {
    let config = small(1);
    let mut classifier = GestureClassifier::new(config.classifier.clone());
    let mut swarm = Swarm::new(&config);

    let emitted: Vec<GestureState> = closing_hand(config.tracking.tick_hz)
        .iter()
        .filter_map(|hand| classifier.classify(Some(hand)))
        .collect();
    assert_eq!(emitted, vec![GestureState::Fist]);

    let mut prev = swarm.mean_target_distance();
    for frame in 1..=240 {
        swarm.step(GestureState::Fist, FrameTime::at_rate(frame, 60.0));
        let now = swarm.mean_target_distance();
        assert!(now < prev || now < 1e-5, "frame {}: {} -> {}", frame, prev, now);
        prev = now;
    }
    assert!(prev < 1e-3);
}

#[test]
fn test_closing_hand_through_tracker() {
    let config = small(2);
    let (publisher, reader) = gesture_channel();
    let changes = reader.subscribe();
    let tracking = TrackingConfig {
        tick_hz: 0.0,
        ..Default::default()
    };
    let source = ScriptedSource::new(closing_hand(30.0).into_iter().map(Some));
    let tracker = spawn_tracker(
        source,
        GestureClassifier::new(config.classifier.clone()),
        publisher,
        &tracking,
    );

    assert_eq!(tracker.wait_status(Duration::from_secs(2)), Some(TrackerStatus::Running));
    assert_eq!(changes.recv_timeout(Duration::from_secs(2)), Ok(GestureState::Fist));
    // The script then runs dry and reports no hand, which is one more change.
    assert_eq!(changes.recv_timeout(Duration::from_secs(2)), Ok(GestureState::None));
    tracker.join();
    assert!(changes.try_recv().is_err());
}

// ============================================================================
// Classifier properties
// ============================================================================

#[test]
fn test_emissions_never_repeat() {
    let mut rng = SmallRng::seed_from_u64(0xdecade);
    for _ in 0..50 {
        let mut classifier = GestureClassifier::default();
        let mut last = GestureState::None;
        for _ in 0..500 {
            let detection = if rng.gen_bool(0.8) {
                let reach = rng.gen_range(0.0..0.9);
                Some(HandDetection::synthetic(reach, rng.gen_range(0.85..1.0)))
            } else {
                None
            };
            if let Some(state) = classifier.classify(detection.as_ref()) {
                assert_ne!(state, last);
                last = state;
            }
        }
    }
}

#[test]
fn test_fixed_metric_bands() {
    // 0.5 with no usable hand: decay path, reported as NONE.
    let mut classifier = classifier_at(0.5);
    assert_eq!(classifier.classify(None), None);
    assert_eq!(classifier.current(), GestureState::None);

    // A hand that holds the metric at 0.1 is a fist.
    let mut classifier = classifier_at(0.1);
    assert_eq!(
        classifier.classify(Some(&HandDetection::synthetic(0.1, 0.95))),
        Some(GestureState::Fist)
    );
    assert!((classifier.smoothed() - 0.1).abs() < 1e-5);
}

#[test]
fn test_absent_hand_relaxes_to_neutral() {
    let mut classifier = classifier_at(0.5);
    for _ in 0..200 {
        classifier.classify(None);
    }
    assert!((classifier.smoothed() - 0.3).abs() < 1e-3);
    assert_eq!(classifier.current(), GestureState::None);
}

// ============================================================================
// Swarm properties
// ============================================================================

#[test]
fn test_field_matches_particle_count() {
    for strategy in [ShapeStrategy::Parametric, ShapeStrategy::Rejection] {
        let mut config = small(3);
        config.shape.strategy = strategy;
        let mut swarm = Swarm::new(&config);
        let deltas = [0.0, 1.0 / 240.0, 1.0 / 60.0, 0.5, 3.0];
        for (frame, delta) in deltas.into_iter().enumerate() {
            for gesture in [GestureState::None, GestureState::Open, GestureState::Fist] {
                swarm.step(
                    gesture,
                    FrameTime {
                        elapsed: frame as f32,
                        delta,
                        frame: frame as u64,
                    },
                );
                assert_eq!(swarm.field().len(), swarm.particles().len());
            }
        }
    }
}

#[test]
fn test_shape_field_idempotent() {
    let config = small(4);
    let motifs = Swarm::new(&config).particles().motifs();
    assert_eq!(
        ShapeField::generate(&config.shape, &motifs),
        ShapeField::generate(&config.shape, &motifs)
    );
}

#[test]
fn test_buckets_cover_every_particle() {
    let config = small(5);
    let mut swarm = Swarm::new(&config);
    let frame = swarm.step(GestureState::None, FrameTime::at_rate(1, 60.0));
    let round = frame.bucket(Category::Round).len();
    let angular = frame.bucket(Category::Angular).len();
    assert_eq!(round + angular, config.shape.particle_count);
    assert_eq!(round, swarm.particles().count(Category::Round));
}

#[test]
fn test_gesture_switch_applies_next_frame() {
    let mut swarm = Swarm::new(&small(6));
    for frame in 1..=120 {
        swarm.step(GestureState::Fist, FrameTime::at_rate(frame, 60.0));
    }
    let assembled = swarm.mean_target_distance();
    swarm.step(GestureState::Open, FrameTime::at_rate(121, 60.0));
    assert!(swarm.mean_target_distance() > assembled + 0.5);
}

#[test]
fn test_zero_delta_frames_still_assemble() {
    let mut swarm = Swarm::new(&small(7));
    let mut prev = swarm.mean_target_distance();
    for frame in 1..=60 {
        let time = FrameTime {
            elapsed: 0.0,
            delta: 0.0,
            frame,
        };
        swarm.step(GestureState::Fist, time);
        let now = swarm.mean_target_distance();
        assert!(now < prev || now < 1e-5, "frame {}: {} -> {}", frame, prev, now);
        prev = now;
    }
}
