//! Tracking worker around the external landmark model.
//!
//! The public interface is [`spawn_tracker`]: it moves a [`LandmarkSource`]
//! onto its own thread, classifies every result, and writes state changes
//! into a [`GesturePublisher`]. The render loop never waits on it.
//!
//! Consumers don't need to know whether detections come from a camera-backed
//! model or a [`ScriptedSource`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::TrackingConfig;
use crate::error::TrackingError;
use crate::gesture::{GestureClassifier, GestureState};
use crate::landmarks::HandDetection;
use crate::signal::GesturePublisher;

// ========== LandmarkSource trait ==========

/// Anything that can turn camera frames into hand detections.
///
/// `detect` is one landmark request: it blocks until the model answers and
/// returns the ranked detections for that frame (empty when no hand is seen).
/// The worker calls it serially, so there is never more than one request in
/// flight.
pub trait LandmarkSource: Send + 'static {
    /// Acquire the camera/model. An error here means tracking is unavailable.
    fn open(&mut self) -> Result<(), TrackingError> {
        Ok(())
    }

    /// Run one landmark request.
    fn detect(&mut self) -> Result<Vec<HandDetection>, TrackingError>;

    /// Release the camera/model.
    fn close(&mut self) {}
}

// ========== Worker ==========

/// Lifecycle reports from the worker, for presentation.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerStatus {
    /// The source opened and ticks are running.
    Running,
    /// The source failed fatally. The gesture is pinned at `None`.
    Unavailable(TrackingError),
    /// The worker exited after cancellation.
    Stopped,
}

/// Handle to a running tracking worker.
///
/// Dropping the handle cancels the worker without waiting for it.
pub struct Tracker {
    cancel: Arc<AtomicBool>,
    status_rx: Receiver<TrackerStatus>,
    thread: Option<JoinHandle<()>>,
}

/// Spawn a tracking worker on its own thread.
pub fn spawn_tracker<S: LandmarkSource>(
    source: S,
    classifier: GestureClassifier,
    publisher: GesturePublisher,
    config: &TrackingConfig,
) -> Tracker {
    let cancel = Arc::new(AtomicBool::new(false));
    let (status_tx, status_rx) = mpsc::channel();
    let interval = if config.tick_hz > 0.0 {
        Some(Duration::from_secs_f32(1.0 / config.tick_hz))
    } else {
        None
    };

    let worker = Worker {
        source,
        classifier,
        publisher,
        cancel: cancel.clone(),
        status: status_tx,
        interval,
        max_hands: config.max_hands.max(1),
    };
    let thread = thread::Builder::new()
        .name("handswarm-tracker".into())
        .spawn(move || worker.run())
        .ok();

    if thread.is_none() {
        log::warn!("Failed to spawn tracking thread; gesture stays at NONE");
    }

    Tracker {
        cancel,
        status_rx,
        thread,
    }
}

impl Tracker {
    /// Next pending status report, if any.
    pub fn poll_status(&self) -> Option<TrackerStatus> {
        self.status_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next status report.
    pub fn wait_status(&self, timeout: Duration) -> Option<TrackerStatus> {
        self.status_rx.recv_timeout(timeout).ok()
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Ask the worker to stop and return immediately.
    ///
    /// A request already in flight is abandoned: its result is discarded
    /// when it arrives and the thread exits on its own.
    pub fn shutdown(mut self) {
        self.cancel.store(true, Ordering::Release);
        self.thread.take();
    }

    /// Stop the worker and block until it has exited.
    pub fn join(mut self) {
        self.cancel.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Tracking thread panicked");
            }
        }
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Release);
    }
}

struct Worker<S> {
    source: S,
    classifier: GestureClassifier,
    publisher: GesturePublisher,
    cancel: Arc<AtomicBool>,
    status: Sender<TrackerStatus>,
    interval: Option<Duration>,
    max_hands: usize,
}

impl<S: LandmarkSource> Worker<S> {
    fn run(mut self) {
        if let Err(e) = self.source.open() {
            self.fail(e);
            return;
        }
        log::info!("Hand tracking started");
        let _ = self.status.send(TrackerStatus::Running);

        while !self.cancelled() {
            let started = Instant::now();
            let result = self.source.detect();
            if self.cancelled() {
                break;
            }

            match result {
                Ok(detections) => {
                    let hands = &detections[..detections.len().min(self.max_hands)];
                    if let Some(state) = self.classifier.classify_ranked(hands) {
                        self.publisher.publish(state);
                    }
                }
                Err(e) if e.is_fatal() => {
                    self.source.close();
                    self.fail(e);
                    return;
                }
                Err(e) => log::debug!("{}", e),
            }

            if let Some(interval) = self.interval {
                let spent = started.elapsed();
                if spent < interval {
                    thread::sleep(interval - spent);
                }
            }
        }

        self.source.close();
        log::info!("Hand tracking stopped");
        let _ = self.status.send(TrackerStatus::Stopped);
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    fn fail(&self, error: TrackingError) {
        log::warn!("{}; continuing in idle mode", error);
        self.publisher.publish(GestureState::None);
        let _ = self.status.send(TrackerStatus::Unavailable(error));
    }
}

// ========== ScriptedSource: replays canned detections (demo and tests) ==========

/// Landmark source that replays a fixed sequence of per-tick results.
///
/// Once the script runs out it reports "no hand" forever, or starts over if
/// built with [`looping`](Self::looping).
pub struct ScriptedSource {
    script: Vec<Result<Vec<HandDetection>, TrackingError>>,
    pending: VecDeque<Result<Vec<HandDetection>, TrackingError>>,
    looping: bool,
    latency: Duration,
}

impl ScriptedSource {
    /// One entry per tick; `None` means no hand in that frame.
    pub fn new(ticks: impl IntoIterator<Item = Option<HandDetection>>) -> Self {
        let script: Vec<_> = ticks
            .into_iter()
            .map(|tick| Ok(tick.into_iter().collect()))
            .collect();
        Self {
            pending: script.iter().cloned().collect(),
            script,
            looping: false,
            latency: Duration::ZERO,
        }
    }

    /// Replay from the start after the last tick.
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Simulate model latency on every request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Insert a scripted failure as the next tick.
    pub fn fail_next(mut self, error: TrackingError) -> Self {
        self.pending.push_front(Err(error));
        self
    }
}

impl LandmarkSource for ScriptedSource {
    fn detect(&mut self) -> Result<Vec<HandDetection>, TrackingError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        if self.pending.is_empty() && self.looping {
            self.pending.extend(self.script.iter().cloned());
        }
        self.pending.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}
