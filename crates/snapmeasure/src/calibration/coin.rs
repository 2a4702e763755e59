//! Reference-object calibration from a circle drawn around a coin.

use serde::{Deserialize, Serialize};

use super::error::{require_finite_point, require_positive, CalibrationError};
use super::types::{Calibration, CalibrationSource, ReferenceCircle};
use crate::units::LengthUnit;

/// Circle the user fitted around a reference object of known diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinInput {
    /// Circle center in image pixels.
    pub center_px: [f64; 2],
    /// Circle radius in image pixels.
    pub radius_px: f64,
    /// Real diameter of the reference object (mm).
    pub known_diameter_mm: f64,
    /// Optional catalog key, e.g. `us_quarter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// `pixels_per_unit = 2 * radius_px / known_diameter_mm`.
pub fn calibrate(input: &CoinInput) -> Result<Calibration, CalibrationError> {
    let center = require_finite_point("center_px", input.center_px)?;
    let radius_px = require_positive("radius_px", input.radius_px)?;
    let diameter_mm = require_positive("known_diameter_mm", input.known_diameter_mm)?;

    let pixels_per_unit = (2.0 * radius_px) / diameter_mm;

    Calibration::new(
        pixels_per_unit,
        LengthUnit::Millimeter,
        diameter_mm,
        CalibrationSource::Coin {
            circle: ReferenceCircle {
                center_px: center,
                radius_px,
            },
            known_diameter_mm: diameter_mm,
            reference: input.reference.clone(),
        },
    )
}
