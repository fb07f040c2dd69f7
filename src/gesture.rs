//! Gesture classification from per-tick hand detections.
//!
//! The classifier turns noisy landmark estimates into one of three discrete
//! states:
//!
//! 1. Detections at or below the confidence gate are treated as absent.
//! 2. The raw openness metric is the mean wrist-to-fingertip distance.
//! 3. It is folded into an exponential moving average.
//! 4. Without a usable hand the average relaxes slowly toward a neutral
//!    baseline instead of snapping.
//! 5. The smoothed value is banded into `Fist` / `None` / `Open`.
//! 6. A state is reported only when it differs from the last one reported.

use std::fmt;

use crate::config::ClassifierConfig;
use crate::landmarks::{best_hand, HandDetection};

/// Discrete hand pose driving the swarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum GestureState {
    /// No hand, or a hand between open and closed.
    #[default]
    None = 0,
    /// Fingers spread: the swarm disperses.
    Open = 1,
    /// Closed fist: the swarm assembles into the shape.
    Fist = 2,
}

impl GestureState {
    /// Upper-case label for presentation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureState::None => "NONE",
            GestureState::Open => "OPEN",
            GestureState::Fist => "FIST",
        }
    }

    /// Decode from the `u8` representation. Unknown values map to `None`.
    #[inline]
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => GestureState::Open,
            2 => GestureState::Fist,
            _ => GestureState::None,
        }
    }
}

impl From<GestureState> for u8 {
    fn from(state: GestureState) -> u8 {
        state as u8
    }
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge-triggered openness classifier.
///
/// Owns the smoothed metric; one instance per tracked session.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    config: ClassifierConfig,
    smoothed: f32,
    last_emitted: GestureState,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            smoothed: config.initial_metric,
            config,
            last_emitted: GestureState::None,
        }
    }

    /// Current smoothed openness metric.
    #[inline]
    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    /// Last state reported by [`classify`](Self::classify).
    #[inline]
    pub fn current(&self) -> GestureState {
        self.last_emitted
    }

    /// Band a smoothed metric into a state.
    pub fn band(&self, metric: f32) -> GestureState {
        if metric > self.config.open_above {
            GestureState::Open
        } else if metric < self.config.fist_below {
            GestureState::Fist
        } else {
            GestureState::None
        }
    }

    /// Feed one tick. Returns the new state only if it changed.
    ///
    /// `None` and detections that fail the confidence gate or lack keypoints
    /// take the decay path and always classify as [`GestureState::None`].
    pub fn classify(&mut self, detection: Option<&HandDetection>) -> Option<GestureState> {
        let raw = detection
            .filter(|d| d.confidence > self.config.min_hand_confidence)
            .and_then(HandDetection::openness);

        let state = match raw {
            Some(openness) => {
                let a = self.config.smoothing;
                self.smoothed = openness * a + self.smoothed * (1.0 - a);
                self.band(self.smoothed)
            }
            None => {
                self.decay();
                GestureState::None
            }
        };

        if !self.smoothed.is_finite() {
            self.smoothed = self.config.neutral_baseline;
        }

        if state != self.last_emitted {
            log::debug!(
                "gesture {} -> {} (metric {:.3})",
                self.last_emitted,
                state,
                self.smoothed
            );
            self.last_emitted = state;
            Some(state)
        } else {
            None
        }
    }

    /// Feed one tick's ranked detection list, using only the best hand.
    pub fn classify_ranked(&mut self, detections: &[HandDetection]) -> Option<GestureState> {
        self.classify(best_hand(detections))
    }

    fn decay(&mut self) {
        let b = self.config.decay;
        self.smoothed = self.config.neutral_baseline * b + self.smoothed * (1.0 - b);
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(reach: f32) -> HandDetection {
        HandDetection::synthetic(reach, 0.95)
    }

    fn starting_at(metric: f32) -> GestureClassifier {
        GestureClassifier::new(ClassifierConfig {
            initial_metric: metric,
            ..Default::default()
        })
    }

    #[test]
    fn test_initial_metric_seeds_smoothed() {
        let c = starting_at(0.5);
        assert_eq!(c.smoothed(), 0.5);
        assert_eq!(c.current(), GestureState::None);
    }

    #[test]
    fn test_band_thresholds() {
        let c = GestureClassifier::default();
        assert_eq!(c.band(0.5), GestureState::Open);
        assert_eq!(c.band(0.3), GestureState::None);
        assert_eq!(c.band(0.1), GestureState::Fist);
        // Boundaries themselves are neutral
        assert_eq!(c.band(0.38), GestureState::None);
        assert_eq!(c.band(0.20), GestureState::None);
    }

    #[test]
    fn test_ema_update() {
        let mut c = GestureClassifier::default();
        c.classify(Some(&hand(0.8)));
        // 0.8 * 0.2 + 0.3 * 0.8
        assert!((c.smoothed() - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_open_hand_emits_once() {
        let mut c = GestureClassifier::default();
        let open = hand(0.6);
        let mut emitted = Vec::new();
        for _ in 0..30 {
            if let Some(s) = c.classify(Some(&open)) {
                emitted.push(s);
            }
        }
        assert_eq!(emitted, vec![GestureState::Open]);
        assert_eq!(c.current(), GestureState::Open);
    }

    #[test]
    fn test_low_confidence_takes_decay_path() {
        let mut c = starting_at(0.5);
        let weak = HandDetection::synthetic(0.05, 0.9);
        assert_eq!(c.classify(Some(&weak)), None);
        // 0.3 * 0.1 + 0.5 * 0.9
        assert!((c.smoothed() - 0.48).abs() < 1e-5);
    }

    #[test]
    fn test_incomplete_detection_is_absent() {
        let mut c = GestureClassifier::default();
        let mut broken = hand(0.05);
        broken.landmarks.truncate(3);
        for _ in 0..20 {
            assert_eq!(c.classify(Some(&broken)), None);
        }
        assert_eq!(c.current(), GestureState::None);
    }

    #[test]
    fn test_decay_trends_to_baseline() {
        let mut c = starting_at(0.5);
        let mut prev = c.smoothed();
        for _ in 0..100 {
            c.classify(None);
            assert!(c.smoothed() < prev);
            prev = c.smoothed();
        }
        assert!((c.smoothed() - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_losing_hand_returns_to_none() {
        let mut c = GestureClassifier::default();
        for _ in 0..30 {
            c.classify(Some(&hand(0.05)));
        }
        assert_eq!(c.current(), GestureState::Fist);
        assert_eq!(c.classify(None), Some(GestureState::None));
    }

    #[test]
    fn test_ranked_uses_most_confident() {
        let mut c = GestureClassifier::default();
        let ranked = vec![
            HandDetection::synthetic(0.05, 0.91),
            HandDetection::synthetic(0.8, 0.99),
        ];
        c.classify_ranked(&ranked);
        assert!(c.smoothed() > 0.3);
    }

    #[test]
    fn test_state_u8_roundtrip() {
        for s in [GestureState::None, GestureState::Open, GestureState::Fist] {
            assert_eq!(GestureState::from_u8(s.into()), s);
        }
        assert_eq!(GestureState::from_u8(200), GestureState::None);
    }
}
