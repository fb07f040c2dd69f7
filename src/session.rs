//! Explicit scheduling loop.
//!
//! A [`Session`] wires the pieces together:
//!
//! ```text
//! LandmarkSource ─(tracker thread)─▶ GesturePublisher ══▶ GestureReader
//!                                                             │ one load per frame
//!                              FrameClock ─▶ Swarm::step ◀────┘
//!                                                │
//!                                                ▼
//!                                           RenderSink
//! ```
//!
//! The render side is single-threaded and never blocks on tracking. Frames
//! are paced to `target_fps` by sleeping off whatever time is left.
//!
//! # Example
//!
//! ```ignore
//! let mut session = Session::new(SwarmConfig::default())?
//!     .with_sink(|frame: &FrameBuffers| upload(frame));
//! session.start_tracking(camera)?;
//! session.run_for(Duration::from_secs(10));
//! session.teardown();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::SwarmConfig;
use crate::error::{SessionError, TrackingError};
use crate::gesture::{GestureClassifier, GestureState};
use crate::signal::{gesture_channel, GesturePublisher, GestureReader};
use crate::simulation::Swarm;
use crate::sink::{NullSink, RenderSink};
use crate::time::FrameClock;
use crate::tracker::{spawn_tracker, LandmarkSource, Tracker, TrackerStatus};

/// A running swarm plus the tracking worker feeding it.
pub struct Session {
    config: SwarmConfig,
    swarm: Swarm,
    reader: GestureReader,
    /// Held until tracking starts; the worker takes ownership.
    publisher: Option<GesturePublisher>,
    tracker: Option<Tracker>,
    sink: Box<dyn RenderSink>,
    clock: FrameClock,
    last_gesture: GestureState,
    tracking_available: bool,
}

impl Session {
    /// Validate `config` and build the swarm. No tracking runs until
    /// [`start_tracking`](Self::start_tracking).
    pub fn new(config: SwarmConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let swarm = Swarm::new(&config);
        let (publisher, reader) = gesture_channel();
        Ok(Self {
            config,
            swarm,
            reader,
            publisher: Some(publisher),
            tracker: None,
            sink: Box::new(NullSink),
            clock: FrameClock::new(),
            last_gesture: GestureState::None,
            tracking_available: true,
        })
    }

    /// Send finished frames to `sink`.
    pub fn with_sink(mut self, sink: impl RenderSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Advance simulated time by exactly `delta` per frame instead of
    /// following the wall clock.
    pub fn with_fixed_delta(mut self, delta: f32) -> Self {
        self.clock = FrameClock::fixed(delta);
        self
    }

    /// Move `source` onto the tracking thread.
    ///
    /// Fails if tracking was already started for this session.
    pub fn start_tracking<S: LandmarkSource>(&mut self, source: S) -> Result<(), SessionError> {
        let publisher = self
            .publisher
            .take()
            .ok_or_else(|| TrackingError::Unavailable("tracking already started".into()))?;
        let classifier = GestureClassifier::new(self.config.classifier.clone());
        self.tracker = Some(spawn_tracker(source, classifier, publisher, &self.config.tracking));
        Ok(())
    }

    /// Simulate and submit one frame. Returns the gesture it ran under.
    pub fn frame(&mut self) -> GestureState {
        self.poll_tracker();

        let gesture = self.reader.current();
        if gesture != self.last_gesture {
            log::info!("Gesture: {} -> {}", self.last_gesture, gesture);
            self.last_gesture = gesture;
        }

        let time = self.clock.tick();
        let frame = self.swarm.step(gesture, time);
        self.sink.submit(frame);
        gesture
    }

    /// Run paced frames for `duration` of wall-clock time.
    pub fn run_for(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        while Instant::now() < deadline {
            self.paced_frame();
        }
    }

    /// Run exactly `frames` paced frames.
    pub fn run_frames(&mut self, frames: u64) {
        for _ in 0..frames {
            self.paced_frame();
        }
    }

    /// Run paced frames until `stop` is set.
    pub fn run_until(&mut self, stop: &AtomicBool) {
        while !stop.load(Ordering::Relaxed) {
            self.paced_frame();
        }
    }

    fn paced_frame(&mut self) {
        let started = Instant::now();
        self.frame();
        if self.config.target_fps > 0.0 {
            let budget = Duration::from_secs_f32(1.0 / self.config.target_fps);
            let spent = started.elapsed();
            if spent < budget {
                thread::sleep(budget - spent);
            }
        }
    }

    fn poll_tracker(&mut self) {
        let Some(tracker) = &self.tracker else {
            return;
        };
        while let Some(status) = tracker.poll_status() {
            match status {
                TrackerStatus::Running => log::debug!("Tracker running"),
                TrackerStatus::Unavailable(e) => {
                    log::warn!("Hand tracking unavailable: {}", e);
                    self.tracking_available = false;
                }
                TrackerStatus::Stopped => log::debug!("Tracker stopped"),
            }
        }
    }

    /// Stop tracking and release the sink. Does not wait for an in-flight
    /// landmark request.
    pub fn teardown(mut self) {
        if let Some(tracker) = self.tracker.take() {
            tracker.shutdown();
        }
        log::info!(
            "Session ended after {} frames ({:.1}s)",
            self.clock.frame(),
            self.clock.elapsed()
        );
    }

    /// Gesture the swarm will use on the next frame.
    pub fn gesture(&self) -> GestureState {
        self.reader.current()
    }

    /// A reader for presentation code.
    pub fn reader(&self) -> GestureReader {
        self.reader.clone()
    }

    /// False once the tracker has reported a fatal failure.
    pub fn tracking_available(&self) -> bool {
        self.tracking_available
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShapeConfig;
    use crate::landmarks::HandDetection;
    use crate::sink::FrameBuffers;
    use crate::tracker::ScriptedSource;
    use std::sync::{Arc, Mutex};

    fn small() -> SwarmConfig {
        SwarmConfig {
            shape: ShapeConfig {
                particle_count: 300,
                outer_count: 200,
                seed: Some(11),
                ..Default::default()
            },
            target_fps: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small();
        config.shape.particle_count = 0;
        assert!(matches!(Session::new(config), Err(SessionError::Config(_))));
    }

    #[test]
    fn test_frames_reach_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let frames = seen.clone();
        let mut session = Session::new(small())
            .unwrap()
            .with_fixed_delta(1.0 / 60.0)
            .with_sink(move |frame: &FrameBuffers| frames.lock().unwrap().push(frame.len()));
        session.run_frames(5);
        assert_eq!(*seen.lock().unwrap(), vec![300; 5]);
        assert_eq!(session.clock().frame(), 5);
    }

    #[test]
    fn test_no_tracking_stays_idle() {
        let mut session = Session::new(small()).unwrap().with_fixed_delta(1.0 / 60.0);
        for _ in 0..10 {
            assert_eq!(session.frame(), GestureState::None);
        }
    }

    #[test]
    fn test_tracking_drives_gesture() {
        let mut config = small();
        config.tracking.tick_hz = 0.0;
        let mut session = Session::new(config).unwrap().with_fixed_delta(1.0 / 60.0);
        let changes = session.reader().subscribe();
        let fist = HandDetection::synthetic(0.05, 0.95);
        session
            .start_tracking(ScriptedSource::new(vec![Some(fist)]).looping())
            .unwrap();
        assert_eq!(changes.recv_timeout(Duration::from_secs(2)), Ok(GestureState::Fist));
        assert_eq!(session.frame(), GestureState::Fist);
        session.teardown();
    }

    #[test]
    fn test_second_start_fails() {
        let mut session = Session::new(small()).unwrap();
        session.start_tracking(ScriptedSource::new(Vec::new())).unwrap();
        assert!(matches!(
            session.start_tracking(ScriptedSource::new(Vec::new())),
            Err(SessionError::Tracking(_))
        ));
        session.teardown();
    }

    #[test]
    fn test_teardown_does_not_wait_for_slow_source() {
        let mut session = Session::new(small()).unwrap();
        let slow = ScriptedSource::new(Vec::new()).with_latency(Duration::from_secs(5));
        session.start_tracking(slow).unwrap();
        session.run_frames(2);
        let started = Instant::now();
        session.teardown();
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
