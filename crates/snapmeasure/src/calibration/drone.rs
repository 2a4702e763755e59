//! Aerial calibration from altitude and camera sensor geometry.

use serde::{Deserialize, Serialize};

use super::config::CalibrationConfig;
use super::error::{require_positive, CalibrationError};
use super::types::{Calibration, CalibrationSource, ReferenceCircle};
use crate::camera::CameraSensor;
use crate::units::LengthUnit;

/// Camera geometry plus the altitude the photo was taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroneInput {
    pub sensor: CameraSensor,
    /// Altitude above the photographed surface (m). Entered manually when
    /// EXIF altitude is missing.
    pub altitude_m: f64,
}

/// `pixels_per_unit = 1 / GSD` in pixels per millimetre.
pub fn calibrate(
    input: &DroneInput,
    config: &CalibrationConfig,
) -> Result<Calibration, CalibrationError> {
    let altitude_m = require_positive("altitude_m", input.altitude_m)?;
    require_positive("sensor_width_mm", input.sensor.sensor_width_mm)?;
    require_positive("focal_length_mm", input.sensor.focal_length_mm)?;
    if !input.sensor.is_valid() {
        return Err(CalibrationError::InvalidSensor);
    }

    let gsd_mm_per_px = input
        .sensor
        .ground_sample_distance_mm(altitude_m)
        .ok_or(CalibrationError::InvalidSensor)?;
    let pixels_per_unit = 1.0 / gsd_mm_per_px;

    let synthetic_circle = ReferenceCircle {
        center_px: input.sensor.image_center_px(),
        radius_px: config.synthetic_circle_radius_px,
    };

    Calibration::new(
        pixels_per_unit,
        LengthUnit::Millimeter,
        altitude_m * 1_000.0,
        CalibrationSource::Drone {
            sensor: input.sensor,
            altitude_m,
            gsd_mm_per_px,
            synthetic_circle,
        },
    )
}
