//! Frame timing for the render loop.
//!
//! A [`FrameClock`] is ticked once per rendered frame and hands the step a
//! [`FrameTime`]. With a fixed delta the clock ignores the wall clock
//! entirely, which makes runs reproducible:
//!
//! ```ignore
//! let mut clock = FrameClock::fixed(1.0 / 60.0);
//! let t = clock.tick();
//! swarm.step(gesture, t);
//! ```

use std::time::{Duration, Instant};

/// Timing handed to one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Frames since start, counting this one.
    pub frame: u64,
}

impl FrameTime {
    /// Frame `frame` of a fixed-rate timeline.
    pub fn at_rate(frame: u64, hz: f32) -> Self {
        let delta = 1.0 / hz;
        Self {
            elapsed: frame as f32 * delta,
            delta,
            frame,
        }
    }
}

/// Per-frame clock with optional fixed delta.
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    /// Fixed delta time for deterministic updates.
    fixed_delta: Option<f32>,
    /// Upper bound on a wall-clock delta, so a stall doesn't become a jump.
    max_delta: f32,
}

impl FrameClock {
    /// Clock driven by the wall clock, starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fixed_delta: None,
            max_delta: 0.25,
        }
    }

    /// Clock that advances exactly `delta` seconds per tick.
    pub fn fixed(delta: f32) -> Self {
        let mut clock = Self::new();
        clock.fixed_delta = Some(delta.max(0.0));
        clock
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.delta_secs = match self.fixed_delta {
            Some(fixed) => fixed,
            None => raw_delta.min(self.max_delta),
        };
        self.elapsed_secs += self.delta_secs;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.now()
    }

    /// Timing of the most recent tick.
    #[inline]
    pub fn now(&self) -> FrameTime {
        FrameTime {
            elapsed: self.elapsed_secs,
            delta: self.delta_secs,
            frame: self.frame_count,
        }
    }

    /// Total simulated seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds covered by the last tick.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Ticks since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Measured frames per wall-clock second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Largest delta a wall-clock tick may report.
    pub fn set_max_delta(&mut self, max_delta: f32) {
        self.max_delta = max_delta.max(0.0);
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_clock_tick() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let t = clock.tick();
        assert!(t.elapsed > 0.0);
        assert!(t.delta > 0.0);
        assert_eq!(t.frame, 1);
    }

    #[test]
    fn test_fixed_delta_ignores_wall_clock() {
        let mut clock = FrameClock::fixed(1.0 / 60.0);
        thread::sleep(Duration::from_millis(50));
        let t = clock.tick();
        assert!((t.delta - 1.0 / 60.0).abs() < 1e-6);
        for _ in 0..59 {
            clock.tick();
        }
        assert!((clock.elapsed() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::new();
        clock.set_max_delta(0.005);
        thread::sleep(Duration::from_millis(30));
        assert!(clock.tick().delta <= 0.005);
    }

    #[test]
    fn test_at_rate() {
        let t = FrameTime::at_rate(30, 60.0);
        assert!((t.elapsed - 0.5).abs() < 1e-6);
        assert_eq!(t.frame, 30);
    }
}
