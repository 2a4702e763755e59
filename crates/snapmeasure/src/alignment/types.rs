use serde::{Deserialize, Serialize};

use super::guidance::GuidanceMessage;

/// One device-orientation reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationSample {
    /// Forward/back tilt (degrees).
    pub beta: f64,
    /// Left/right tilt (degrees).
    pub gamma: f64,
    /// Compass rotation (degrees). Not used for classification.
    #[serde(default)]
    pub alpha: f64,
    /// Acceleration vector `[x, y, z]` (m/s²).
    pub acceleration: [f64; 3],
    /// Host clock in milliseconds; only used to schedule haptic pulses.
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl OrientationSample {
    pub fn new(beta: f64, gamma: f64, acceleration: [f64; 3]) -> Self {
        Self {
            beta,
            gamma,
            alpha: 0.0,
            acceleration,
            timestamp_ms: 0,
        }
    }

    pub fn at(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Returns `true` when every classified field is finite.
    pub fn is_finite(&self) -> bool {
        self.beta.is_finite()
            && self.gamma.is_finite()
            && self.acceleration.iter().all(|v| v.is_finite())
    }
}

/// How the phone is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceOrientation {
    /// Lying roughly flat, camera facing down. Auto-capture allowed.
    Horizontal,
    /// Held upright facing a wall. Capture needs an explicit tap.
    Vertical,
}

/// Discrete capture readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentStatus {
    Good,
    Warning,
    Bad,
}

impl std::fmt::Display for AlignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Bad => "bad",
        };
        f.write_str(name)
    }
}

/// Level-indicator displacement from the center of the bubble disk (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BubbleOffset {
    pub x: f64,
    pub y: f64,
}

impl BubbleOffset {
    pub fn distance(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Classification of one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Deviation from the target orientation (degrees).
    pub tilt_angle: f64,
    pub is_stable: bool,
    pub status: AlignmentStatus,
    pub orientation: DeviceOrientation,
    pub bubble_offset: BubbleOffset,
    pub guidance: Option<GuidanceMessage>,
}

impl AlignmentResult {
    /// Result reported before any usable sample arrived.
    pub(crate) fn unavailable(bubble_radius_px: f64) -> Self {
        Self {
            tilt_angle: 90.0,
            is_stable: false,
            status: AlignmentStatus::Bad,
            orientation: DeviceOrientation::Horizontal,
            bubble_offset: BubbleOffset {
                x: 0.0,
                y: bubble_radius_px,
            },
            guidance: None,
        }
    }

    /// Whether the capture collaborator may trigger a photo without a tap.
    pub fn auto_capture_ready(&self) -> bool {
        self.status == AlignmentStatus::Good
            && self.is_stable
            && self.orientation == DeviceOrientation::Horizontal
    }
}
