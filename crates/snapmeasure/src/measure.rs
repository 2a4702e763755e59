//! Converting on-screen pixel distances into real-world lengths.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::units::LengthUnit;

/// A pixel length that cannot be converted.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// Pixel distance or coordinate is NaN or infinite.
    NonFinite,
    /// Pixel distance is negative.
    Negative {
        /// The rejected pixel distance.
        pixels: f64,
    },
}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite => write!(f, "pixel distance must be finite"),
            Self::Negative { pixels } => {
                write!(f, "pixel distance must not be negative, got {}", pixels)
            }
        }
    }
}

impl std::error::Error for MeasureError {}

/// One dimension line converted through a calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Length on the photo (pixels).
    pub pixels: f64,
    /// Real-world length (mm).
    pub length_mm: f64,
}

impl Measurement {
    /// Real-world length expressed in `unit`.
    pub fn length_in(&self, unit: LengthUnit) -> f64 {
        unit.from_mm(self.length_mm)
    }

    /// Human-readable length, e.g. `"12.35 cm"`.
    pub fn format(&self, unit: LengthUnit, decimals: usize) -> String {
        format!("{:.*} {}", decimals, self.length_in(unit), unit)
    }

    /// Length in the largest unit of `candidates` that keeps the value >= 1,
    /// falling back to the smallest candidate.
    pub fn best_unit(&self, candidates: &[LengthUnit]) -> Option<LengthUnit> {
        let mut sorted: Vec<LengthUnit> = candidates.to_vec();
        sorted.sort_by(|a, b| a.mm_per_unit().total_cmp(&b.mm_per_unit()));
        let smallest = *sorted.first()?;
        Some(
            sorted
                .into_iter()
                .rev()
                .find(|u| self.length_in(*u) >= 1.0)
                .unwrap_or(smallest),
        )
    }
}

impl Calibration {
    /// Convert a pixel distance into millimetres.
    pub fn pixels_to_mm(&self, pixels: f64) -> Result<f64, MeasureError> {
        if !pixels.is_finite() {
            return Err(MeasureError::NonFinite);
        }
        if pixels < 0.0 {
            return Err(MeasureError::Negative { pixels });
        }
        let mm = self.unit().to_mm(pixels / self.pixels_per_unit());
        if !mm.is_finite() {
            return Err(MeasureError::NonFinite);
        }
        Ok(mm)
    }

    /// Convert a pixel distance into `unit`.
    pub fn pixels_to(&self, pixels: f64, unit: LengthUnit) -> Result<f64, MeasureError> {
        self.pixels_to_mm(pixels).map(|mm| unit.from_mm(mm))
    }

    /// Measure the straight line between two image points.
    pub fn measure(&self, from_px: [f64; 2], to_px: [f64; 2]) -> Result<Measurement, MeasureError> {
        if !from_px.iter().chain(to_px.iter()).all(|v| v.is_finite()) {
            return Err(MeasureError::NonFinite);
        }
        let pixels = nalgebra::distance(&Point2::from(from_px), &Point2::from(to_px));
        Ok(Measurement {
            pixels,
            length_mm: self.pixels_to_mm(pixels)?,
        })
    }

    /// Measure a polyline (sum of its segments).
    pub fn measure_path(&self, points_px: &[[f64; 2]]) -> Result<Measurement, MeasureError> {
        let mut total = Measurement {
            pixels: 0.0,
            length_mm: 0.0,
        };
        for pair in points_px.windows(2) {
            let segment = self.measure(pair[0], pair[1])?;
            total.pixels += segment.pixels;
            total.length_mm += segment.length_mm;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::calibration::{compute_calibration, BlueprintInput, CalibrationInput};

    fn one_px_per_mm() -> Calibration {
        compute_calibration(&CalibrationInput::Blueprint(BlueprintInput {
            p1_px: [0.0, 0.0],
            p2_px: [100.0, 0.0],
            distance: 10.0,
            unit: LengthUnit::Centimeter,
            declination_deg: None,
        }))
        .unwrap()
    }

    #[test]
    fn measure_converts_through_scale() {
        let cal = one_px_per_mm();
        let m = cal.measure([10.0, 10.0], [40.0, 50.0]).unwrap();
        assert_relative_eq!(m.pixels, 50.0);
        assert_relative_eq!(m.length_mm, 50.0, epsilon = 1e-12);
        assert_relative_eq!(m.length_in(LengthUnit::Centimeter), 5.0, epsilon = 1e-12);
        assert_eq!(m.format(LengthUnit::Centimeter, 2), "5.00 cm");
    }

    #[test]
    fn path_sums_segments() {
        let cal = one_px_per_mm();
        let m = cal
            .measure_path(&[[0.0, 0.0], [30.0, 0.0], [30.0, 40.0]])
            .unwrap();
        assert_relative_eq!(m.length_mm, 70.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_pixel_lengths_are_rejected() {
        let cal = one_px_per_mm();
        assert_eq!(
            cal.pixels_to_mm(-1.0).unwrap_err(),
            MeasureError::Negative { pixels: -1.0 }
        );
        assert_eq!(cal.pixels_to_mm(f64::NAN).unwrap_err(), MeasureError::NonFinite);
        assert!(cal.measure([f64::INFINITY, 0.0], [0.0, 0.0]).is_err());
    }

    #[test]
    fn best_unit_prefers_largest_readable_unit() {
        let m = Measurement {
            pixels: 0.0,
            length_mm: 2_500.0,
        };
        let metric = [LengthUnit::Millimeter, LengthUnit::Centimeter, LengthUnit::Meter];
        assert_eq!(m.best_unit(&metric), Some(LengthUnit::Meter));
        let tiny = Measurement {
            pixels: 0.0,
            length_mm: 0.2,
        };
        assert_eq!(tiny.best_unit(&metric), Some(LengthUnit::Millimeter));
        assert_eq!(tiny.best_unit(&[]), None);
    }

    #[test]
    fn overflowing_conversion_is_rejected() {
        let source = crate::calibration::CalibrationSource::Blueprint {
            points_px: [[0.0, 0.0], [1e-290, 0.0]],
            distance: 1e10,
            unit: LengthUnit::Millimeter,
            pixel_distance: 1e-290,
            declination_deg: None,
        };
        let cal = Calibration::new(1e-300, LengthUnit::Millimeter, 1e10, source).unwrap();
        assert_eq!(cal.pixels_to_mm(1e300).unwrap_err(), MeasureError::NonFinite);
        assert!(cal.measure([0.0, 0.0], [1e300, 0.0]).is_err());
        assert!(cal.pixels_to_mm(1.0).is_ok());
    }
}
