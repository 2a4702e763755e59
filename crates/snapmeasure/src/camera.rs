//! Camera sensor geometry used by aerial (drone) calibration.
//!
//! A nadir photo taken at a known altitude has a fixed ground footprint per
//! pixel, the ground sample distance (GSD). It depends only on the physical
//! sensor width, the lens focal length and the horizontal image resolution.

use serde::{Deserialize, Serialize};

/// Physical sensor and image geometry of a camera.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraSensor {
    /// Physical sensor width (mm).
    pub sensor_width_mm: f64,
    /// Lens focal length (mm), not the 35 mm equivalent.
    pub focal_length_mm: f64,
    /// Horizontal image resolution (pixels).
    pub image_width_px: u32,
    /// Vertical image resolution (pixels).
    pub image_height_px: u32,
}

impl CameraSensor {
    /// Returns `true` when all dimensions are finite and strictly positive.
    pub fn is_valid(self) -> bool {
        self.sensor_width_mm.is_finite()
            && self.focal_length_mm.is_finite()
            && self.sensor_width_mm > 0.0
            && self.focal_length_mm > 0.0
            && self.image_width_px > 0
            && self.image_height_px > 0
    }

    /// Ground sample distance in millimetres per pixel at `altitude_m`.
    ///
    /// `GSD = (altitude_mm * sensor_width_mm) / (focal_length_mm * image_width_px)`.
    /// Returns `None` for an invalid sensor or a non-positive altitude.
    pub fn ground_sample_distance_mm(self, altitude_m: f64) -> Option<f64> {
        if !self.is_valid() || !altitude_m.is_finite() || altitude_m <= 0.0 {
            return None;
        }
        let altitude_mm = altitude_m * 1_000.0;
        let gsd = (altitude_mm * self.sensor_width_mm)
            / (self.focal_length_mm * self.image_width_px as f64);
        gsd.is_finite().then_some(gsd)
    }

    /// Ground footprint `[width, height]` in metres at `altitude_m`.
    pub fn footprint_m(self, altitude_m: f64) -> Option<[f64; 2]> {
        let gsd = self.ground_sample_distance_mm(altitude_m)?;
        Some([
            gsd * self.image_width_px as f64 / 1_000.0,
            gsd * self.image_height_px as f64 / 1_000.0,
        ])
    }

    /// Image center in pixel coordinates.
    pub fn image_center_px(self) -> [f64; 2] {
        [
            self.image_width_px as f64 / 2.0,
            self.image_height_px as f64 / 2.0,
        ]
    }
}
