//! The durable calibration record and its provenance.

use serde::{Deserialize, Serialize};

use super::error::CalibrationError;
use crate::camera::CameraSensor;
use crate::units::{LengthUnit, ScreenUnit};

/// Which modality produced a calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationType {
    Coin,
    Verbal,
    Drone,
    Blueprint,
}

impl std::fmt::Display for CalibrationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Coin => "coin",
            Self::Verbal => "verbal",
            Self::Drone => "drone",
            Self::Blueprint => "blueprint",
        };
        f.write_str(name)
    }
}

/// On-image circle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCircle {
    pub center_px: [f64; 2],
    pub radius_px: f64,
}

/// Inputs and intermediate values a calibration was derived from.
///
/// Kept so the measurement overlay can redraw the reference and so a stored
/// calibration can be audited later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalibrationSource {
    Coin {
        circle: ReferenceCircle,
        known_diameter_mm: f64,
        /// Catalog key of the reference object, when one was picked.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference: Option<String>,
    },
    Verbal {
        screen_distance: f64,
        screen_unit: ScreenUnit,
        real_distance: f64,
        real_unit: LengthUnit,
        image_width_px: u32,
        /// Physical screen width assumed for `screen_unit`.
        assumed_screen_width: f64,
        screen_distance_px: f64,
    },
    Drone {
        sensor: CameraSensor,
        altitude_m: f64,
        gsd_mm_per_px: f64,
        /// Display-only circle at the image center.
        synthetic_circle: ReferenceCircle,
    },
    Blueprint {
        points_px: [[f64; 2]; 2],
        distance: f64,
        unit: LengthUnit,
        pixel_distance: f64,
        /// Magnetic declination in degrees, East positive. Stored, never applied.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        declination_deg: Option<f64>,
    },
}

impl CalibrationSource {
    pub fn calibration_type(&self) -> CalibrationType {
        match self {
            Self::Coin { .. } => CalibrationType::Coin,
            Self::Verbal { .. } => CalibrationType::Verbal,
            Self::Drone { .. } => CalibrationType::Drone,
            Self::Blueprint { .. } => CalibrationType::Blueprint,
        }
    }

    /// Reference circle to draw over the photo, if the modality has one.
    pub fn reference_circle(&self) -> Option<ReferenceCircle> {
        match self {
            Self::Coin { circle, .. } => Some(*circle),
            Self::Drone {
                synthetic_circle, ..
            } => Some(*synthetic_circle),
            Self::Verbal { .. } | Self::Blueprint { .. } => None,
        }
    }
}

/// A validated pixel-to-real-world scale for one photo.
///
/// Construction always goes through [`Calibration::new`] (deserialization
/// included), so `pixels_per_unit` is finite and strictly positive for every
/// value of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CalibrationRecord")]
pub struct Calibration {
    pixels_per_unit: f64,
    unit: LengthUnit,
    reference_distance: f64,
    calibration_type: CalibrationType,
    source: CalibrationSource,
}

#[derive(Deserialize)]
struct CalibrationRecord {
    pixels_per_unit: f64,
    unit: LengthUnit,
    reference_distance: f64,
    calibration_type: CalibrationType,
    source: CalibrationSource,
}

impl TryFrom<CalibrationRecord> for Calibration {
    type Error = String;

    fn try_from(r: CalibrationRecord) -> Result<Self, Self::Error> {
        if r.calibration_type != r.source.calibration_type() {
            return Err(format!(
                "calibration_type '{}' does not match source '{}'",
                r.calibration_type,
                r.source.calibration_type()
            ));
        }
        Self::new(r.pixels_per_unit, r.unit, r.reference_distance, r.source)
            .map_err(|e| e.to_string())
    }
}

impl Calibration {
    /// Build a calibration, rejecting any non-finite or non-positive scale.
    pub fn new(
        pixels_per_unit: f64,
        unit: LengthUnit,
        reference_distance: f64,
        source: CalibrationSource,
    ) -> Result<Self, CalibrationError> {
        if !pixels_per_unit.is_finite() || pixels_per_unit <= 0.0 {
            return Err(CalibrationError::InvalidScale { pixels_per_unit });
        }
        if !reference_distance.is_finite() || reference_distance <= 0.0 {
            return Err(CalibrationError::NonPositive {
                field: "reference_distance",
                value: reference_distance,
            });
        }
        Ok(Self {
            pixels_per_unit,
            unit,
            reference_distance,
            calibration_type: source.calibration_type(),
            source,
        })
    }

    /// Pixels per one `unit` of real-world length.
    pub fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }

    /// Canonical unit of `pixels_per_unit`.
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Real-world length of the reference, in `unit`.
    pub fn reference_distance(&self) -> f64 {
        self.reference_distance
    }

    pub fn calibration_type(&self) -> CalibrationType {
        self.calibration_type
    }

    pub fn source(&self) -> &CalibrationSource {
        &self.source
    }

    /// Real-world length (mm) covered by one pixel.
    pub fn mm_per_pixel(&self) -> f64 {
        self.unit.to_mm(1.0) / self.pixels_per_unit
    }

    /// Stored declination for blueprint calibrations.
    pub fn declination_deg(&self) -> Option<f64> {
        match &self.source {
            CalibrationSource::Blueprint {
                declination_deg, ..
            } => *declination_deg,
            _ => None,
        }
    }
}
