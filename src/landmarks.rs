//! Hand landmark data as delivered by the external tracking model.
//!
//! A [`HandDetection`] is one hand: 21 keypoints in normalized image space
//! plus the model's confidence that this really is a hand. Detections only
//! live for one tracking tick.

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Number of keypoints in a complete detection.
pub const LANDMARK_COUNT: usize = 21;

/// Fingertips used for the openness metric. The thumb is left out: its tip
/// barely moves relative to the wrist between a fist and an open palm.
pub const OPENNESS_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single tracked keypoint.
///
/// `x` and `y` are normalized to [0, 1] image space; `z` is relative depth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Per-point visibility reported by the model.
    pub confidence: f32,
}

impl HandLandmark {
    /// Landmark at an image position with full visibility.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0, confidence: 1.0 }
    }

    /// Distance to another landmark in the image plane.
    #[inline]
    pub fn planar_distance(&self, other: &HandLandmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One detected hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandDetection {
    /// Keypoints indexed by the constants in this module.
    pub landmarks: Vec<HandLandmark>,
    /// Handedness confidence in [0, 1].
    pub confidence: f32,
}

impl HandDetection {
    pub fn new(landmarks: Vec<HandLandmark>, confidence: f32) -> Self {
        Self { landmarks, confidence }
    }

    /// Keypoint by index, if present.
    #[inline]
    pub fn landmark(&self, index: usize) -> Option<&HandLandmark> {
        self.landmarks.get(index)
    }

    /// Whether every keypoint the classifier reads is present and finite.
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= LANDMARK_COUNT && self.landmarks.iter().all(HandLandmark::is_finite)
    }

    /// Mean wrist-to-fingertip distance over the four long fingers.
    ///
    /// Returns `None` if a required keypoint is missing or non-finite.
    pub fn openness(&self) -> Option<f32> {
        if !self.is_complete() {
            return None;
        }
        let wrist = self.landmark(WRIST)?;
        let mut total = 0.0;
        for &tip in &OPENNESS_TIPS {
            total += self.landmark(tip)?.planar_distance(wrist);
        }
        Some(total / OPENNESS_TIPS.len() as f32)
    }

    /// Synthetic hand whose four fingertips sit `reach` from the wrist.
    ///
    /// Used by the demo source and tests; the remaining joints are spread
    /// along each finger.
    pub fn synthetic(reach: f32, confidence: f32) -> Self {
        let wrist = HandLandmark::new(0.5, 0.8);
        let mut landmarks = vec![wrist; LANDMARK_COUNT];
        // Finger fan angles (radians from straight up), thumb first.
        let fan = [-0.9_f32, -0.3, 0.0, 0.25, 0.5];
        for (finger, angle) in fan.iter().enumerate() {
            let (dx, dy) = (angle.sin(), -angle.cos());
            for joint in 0..4 {
                let t = (joint + 1) as f32 / 4.0;
                landmarks[1 + finger * 4 + joint] =
                    HandLandmark::new(wrist.x + dx * reach * t, wrist.y + dy * reach * t);
            }
        }
        Self { landmarks, confidence }
    }
}

/// Pick the single most confident hand from a ranked list.
///
/// The upstream ranking is not trusted; ties keep the earlier entry.
pub fn best_hand(detections: &[HandDetection]) -> Option<&HandDetection> {
    detections.iter().fold(None, |best: Option<&HandDetection>, d| match best {
        Some(b) if b.confidence >= d.confidence => Some(b),
        _ => Some(d),
    })
}
