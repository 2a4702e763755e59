use serde::{Deserialize, Serialize};

use super::haptics::{HapticPulse, PulseKind};

/// Upper bounds a sample must meet to earn a status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusGate {
    /// Maximum bubble distance from center (pixels).
    pub max_offset_px: f64,
    /// Maximum tilt angle (degrees).
    pub max_tilt_deg: f64,
}

/// Thresholds for the guidance message priority chain.
///
/// Severities are normalized to `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Acceleration variance ((m/s²)²) mapping to full motion severity.
    pub motion_variance_full_scale: f64,
    /// Motion severity above which "Hold still" wins.
    pub hold_still_severity: f64,
    /// Tilt (degrees) mapping to full tilt severity.
    pub tilt_full_scale_deg: f64,
    /// Tilt severity above which a directional correction is shown.
    pub tilt_correction_severity: f64,
    /// Minimum tilt (degrees) for a directional correction.
    pub tilt_correction_min_deg: f64,
    /// "Almost there" tilt band `(min, max]` in degrees.
    pub almost_there_deg: [f64; 2],
    /// Motion severity must stay below this for "Almost there".
    pub almost_there_max_motion: f64,
    /// Motion severity above which a good but unstable device gets "Hold that".
    pub hold_that_min_motion: f64,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            motion_variance_full_scale: 0.15,
            hold_still_severity: 0.6,
            tilt_full_scale_deg: 25.0,
            tilt_correction_severity: 0.4,
            tilt_correction_min_deg: 5.0,
            almost_there_deg: [2.0, 5.0],
            almost_there_max_motion: 0.4,
            hold_that_min_motion: 0.2,
        }
    }
}

/// Pulse patterns played when the status changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticConfig {
    pub enabled: bool,
    pub bad: Vec<HapticPulse>,
    pub warning: Vec<HapticPulse>,
    /// Escalating burst ending in a success notification.
    pub good: Vec<HapticPulse>,
}

impl Default for HapticConfig {
    fn default() -> Self {
        let pulse = |offset_ms, kind| HapticPulse { offset_ms, kind };
        Self {
            enabled: true,
            bad: vec![pulse(0, PulseKind::Light)],
            warning: vec![pulse(0, PulseKind::Light), pulse(80, PulseKind::Light)],
            good: vec![
                pulse(0, PulseKind::Light),
                pulse(50, PulseKind::Light),
                pulse(100, PulseKind::Light),
                pulse(160, PulseKind::Medium),
                pulse(220, PulseKind::Medium),
                pulse(270, PulseKind::Medium),
                pulse(320, PulseKind::Success),
            ],
        }
    }
}

/// Tunables for [`AlignmentClassifier`](super::AlignmentClassifier).
///
/// Windows are counted in samples, never in wall-clock time, so the same
/// configuration behaves identically at 16 ms and 50 ms sensor periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Exponential smoothing factor applied to beta/gamma, in `(0, 1]`.
    pub smoothing_alpha: f64,
    /// Capacity of the tilt and acceleration history windows (samples).
    pub window_len: usize,
    /// Samples required in both windows before stability is evaluated.
    pub min_stability_samples: usize,
    /// Smoothed |beta| and |gamma| must both stay below this for the
    /// horizontal orientation (degrees).
    pub horizontal_limit_deg: f64,
    /// Maximum tilt spread (max - min) over the window for stability (degrees).
    pub stable_tilt_spread_deg: f64,
    /// Maximum acceleration-magnitude spread over the window (m/s²).
    pub stable_accel_spread: f64,
    pub good: StatusGate,
    pub warning: StatusGate,
    /// Radius of the bubble disk (pixels).
    pub bubble_radius_px: f64,
    /// Tilt (degrees) that maps to the rim of the bubble disk.
    pub bubble_full_scale_deg: f64,
    pub guidance: GuidanceConfig,
    pub haptics: HapticConfig,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.5,
            window_len: 10,
            min_stability_samples: 3,
            horizontal_limit_deg: 45.0,
            stable_tilt_spread_deg: 1.5,
            stable_accel_spread: 0.2,
            good: StatusGate {
                max_offset_px: 6.0,
                max_tilt_deg: 1.5,
            },
            warning: StatusGate {
                max_offset_px: 12.0,
                max_tilt_deg: 5.0,
            },
            bubble_radius_px: 48.0,
            bubble_full_scale_deg: 20.0,
            guidance: GuidanceConfig::default(),
            haptics: HapticConfig::default(),
        }
    }
}

impl AlignmentConfig {
    /// Bubble displacement (pixels) per degree of tilt.
    pub fn bubble_px_per_deg(&self) -> f64 {
        self.bubble_radius_px / self.bubble_full_scale_deg
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(format!(
                "alignment.smoothing_alpha must be in (0, 1], got {}",
                self.smoothing_alpha
            ));
        }
        if self.window_len == 0 {
            return Err("alignment.window_len must be > 0".to_string());
        }
        if self.min_stability_samples == 0 || self.min_stability_samples > self.window_len {
            return Err(format!(
                "alignment.min_stability_samples must be in 1..={}, got {}",
                self.window_len, self.min_stability_samples
            ));
        }
        let positive = [
            ("horizontal_limit_deg", self.horizontal_limit_deg),
            ("bubble_radius_px", self.bubble_radius_px),
            ("bubble_full_scale_deg", self.bubble_full_scale_deg),
            ("guidance.motion_variance_full_scale", self.guidance.motion_variance_full_scale),
            ("guidance.tilt_full_scale_deg", self.guidance.tilt_full_scale_deg),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("alignment.{} must be > 0, got {}", name, value));
            }
        }
        if self.good.max_tilt_deg > self.warning.max_tilt_deg
            || self.good.max_offset_px > self.warning.max_offset_px
        {
            return Err("alignment.good gate must be tighter than alignment.warning".to_string());
        }
        Ok(())
    }
}
