//! Verbal (map-scale) calibration: "5 cm on screen = 1 km in reality".
//!
//! The on-screen distance is converted to image pixels by assuming the photo
//! spans the full width of a phone screen of known physical size
//! ([`CalibrationConfig::screen_width_cm`]). Devices with a different screen
//! width get proportionally scaled results.

use serde::{Deserialize, Serialize};

use super::config::CalibrationConfig;
use super::error::{require_positive, CalibrationError};
use super::types::{Calibration, CalibrationSource};
use crate::units::{LengthUnit, ScreenUnit};

/// A user-entered scale statement plus the photo width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerbalScaleInput {
    pub screen_distance: f64,
    pub screen_unit: ScreenUnit,
    pub real_distance: f64,
    pub real_unit: LengthUnit,
    /// Horizontal resolution of the photo (pixels).
    pub image_width_px: u32,
}

/// Calibrate from a verbal scale; result is in pixels per millimetre.
pub fn calibrate(
    input: &VerbalScaleInput,
    config: &CalibrationConfig,
) -> Result<Calibration, CalibrationError> {
    let screen_distance = require_positive("screen_distance", input.screen_distance)?;
    let real_distance = require_positive("real_distance", input.real_distance)?;
    if input.image_width_px == 0 {
        return Err(CalibrationError::NonPositive {
            field: "image_width_px",
            value: 0.0,
        });
    }
    let screen_width = require_positive("screen_width", config.screen_width(input.screen_unit))?;

    let pixels_per_screen_unit = input.image_width_px as f64 / screen_width;
    let screen_distance_px = screen_distance * pixels_per_screen_unit;
    let real_distance_mm = input.real_unit.to_mm(real_distance);
    let pixels_per_unit = screen_distance_px / real_distance_mm;

    Calibration::new(
        pixels_per_unit,
        LengthUnit::Millimeter,
        real_distance_mm,
        CalibrationSource::Verbal {
            screen_distance,
            screen_unit: input.screen_unit,
            real_distance,
            real_unit: input.real_unit,
            image_width_px: input.image_width_px,
            assumed_screen_width: screen_width,
            screen_distance_px,
        },
    )
}
