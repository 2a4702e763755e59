//! Known-distance calibration from two points on a blueprint or plan.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use super::error::{require_finite_point, require_positive, CalibrationError};
use super::types::{Calibration, CalibrationSource};
use crate::units::LengthUnit;

const MAX_ABS_DECLINATION_DEG: f64 = 180.0;

/// Two user-placed points and the real distance between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintInput {
    pub p1_px: [f64; 2],
    pub p2_px: [f64; 2],
    pub distance: f64,
    pub unit: LengthUnit,
    /// Magnetic declination (degrees, East positive) for later azimuth
    /// corrections by the measurement overlay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declination_deg: Option<f64>,
}

/// `pixels_per_unit = |p1 - p2| / distance_mm`.
pub fn calibrate(input: &BlueprintInput) -> Result<Calibration, CalibrationError> {
    let p1 = require_finite_point("p1_px", input.p1_px)?;
    let p2 = require_finite_point("p2_px", input.p2_px)?;
    let distance = require_positive("distance", input.distance)?;
    if let Some(degrees) = input.declination_deg {
        if !degrees.is_finite() || degrees.abs() > MAX_ABS_DECLINATION_DEG {
            return Err(CalibrationError::DeclinationOutOfRange { degrees });
        }
    }

    let pixel_distance = nalgebra::distance(&Point2::from(p1), &Point2::from(p2));
    if pixel_distance <= f64::EPSILON {
        return Err(CalibrationError::CoincidentPoints);
    }
    let distance_mm = input.unit.to_mm(distance);
    let pixels_per_unit = pixel_distance / distance_mm;

    Calibration::new(
        pixels_per_unit,
        LengthUnit::Millimeter,
        distance_mm,
        CalibrationSource::Blueprint {
            points_px: [p1, p2],
            distance,
            unit: input.unit,
            pixel_distance,
            declination_deg: input.declination_deg,
        },
    )
}
