//! User-facing guidance selection.
//!
//! Exactly one message (or none) is chosen per sample, in priority order:
//! motion first, then large tilt, then fine tilt, then the final hold.

use serde::{Deserialize, Serialize};

use super::config::GuidanceConfig;
use super::types::{AlignmentStatus, DeviceOrientation};

/// Which way the user should tilt the phone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiltCorrection {
    Forward,
    Back,
    Left,
    Right,
    /// Vertical mode: top edge leans toward the user.
    TopAway,
    /// Vertical mode: top edge leans away from the user.
    TopTowardYou,
}

/// A guidance message shown over the camera preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceMessage {
    HoldStill,
    Tilt(TiltCorrection),
    AlmostThere,
    HoldThat,
}

impl GuidanceMessage {
    pub fn text(&self) -> &'static str {
        match self {
            Self::HoldStill => "Hold still",
            Self::Tilt(TiltCorrection::Forward) => "Tilt forward",
            Self::Tilt(TiltCorrection::Back) => "Tilt back",
            Self::Tilt(TiltCorrection::Left) => "Tilt left",
            Self::Tilt(TiltCorrection::Right) => "Tilt right",
            Self::Tilt(TiltCorrection::TopAway) => "Tilt the top away from you",
            Self::Tilt(TiltCorrection::TopTowardYou) => "Tilt the top toward you",
            Self::AlmostThere => "Almost there...",
            Self::HoldThat => "Hold that",
        }
    }
}

impl std::fmt::Display for GuidanceMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Everything the message selector looks at for one sample.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GuidanceInputs {
    pub tilt_angle: f64,
    pub accel_variance: f64,
    pub status: AlignmentStatus,
    pub is_stable: bool,
    pub orientation: DeviceOrientation,
    /// Smoothed beta (degrees).
    pub beta: f64,
    /// Smoothed gamma (degrees).
    pub gamma: f64,
}

/// Motion severity in `[0, 1]`.
pub(crate) fn motion_severity(accel_variance: f64, cfg: &GuidanceConfig) -> f64 {
    (accel_variance / cfg.motion_variance_full_scale).min(1.0)
}

pub(crate) fn select(inputs: &GuidanceInputs, cfg: &GuidanceConfig) -> Option<GuidanceMessage> {
    let motion = motion_severity(inputs.accel_variance, cfg);
    if motion > cfg.hold_still_severity {
        return Some(GuidanceMessage::HoldStill);
    }

    let tilt = inputs.tilt_angle;
    let tilt_severity = (tilt / cfg.tilt_full_scale_deg).min(1.0);
    if tilt_severity > cfg.tilt_correction_severity && tilt > cfg.tilt_correction_min_deg {
        return Some(GuidanceMessage::Tilt(correction(inputs)));
    }

    let [near_min, near_max] = cfg.almost_there_deg;
    if tilt > near_min && tilt <= near_max && motion < cfg.almost_there_max_motion {
        return Some(GuidanceMessage::AlmostThere);
    }

    if inputs.status == AlignmentStatus::Good
        && !inputs.is_stable
        && motion > cfg.hold_that_min_motion
    {
        return Some(GuidanceMessage::HoldThat);
    }

    None
}

fn correction(inputs: &GuidanceInputs) -> TiltCorrection {
    match inputs.orientation {
        DeviceOrientation::Horizontal => {
            if inputs.beta.abs() >= inputs.gamma.abs() {
                if inputs.beta > 0.0 {
                    TiltCorrection::Forward
                } else {
                    TiltCorrection::Back
                }
            } else if inputs.gamma > 0.0 {
                TiltCorrection::Left
            } else {
                TiltCorrection::Right
            }
        }
        DeviceOrientation::Vertical => {
            if inputs.beta.abs() > 90.0 {
                TiltCorrection::TopAway
            } else {
                TiltCorrection::TopTowardYou
            }
        }
    }
}
