use serde::{Deserialize, Serialize};

use crate::units::ScreenUnit;

/// Tunables for the calibration engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Assumed physical width of the phone screen in centimetres.
    ///
    /// Verbal-scale calibration cannot query the real screen size, so results
    /// are only as accurate as this assumption for the user's device.
    pub screen_width_cm: f64,
    /// Assumed physical width of the phone screen in inches.
    pub screen_width_in: f64,
    /// Radius (pixels) of the display-only reference circle recorded for
    /// drone calibrations.
    pub synthetic_circle_radius_px: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            screen_width_cm: 10.8,
            screen_width_in: 4.25,
            synthetic_circle_radius_px: 100.0,
        }
    }
}

impl CalibrationConfig {
    /// Assumed physical screen width expressed in `unit`.
    pub fn screen_width(&self, unit: ScreenUnit) -> f64 {
        match unit {
            ScreenUnit::Centimeter => self.screen_width_cm,
            ScreenUnit::Inch => self.screen_width_in,
        }
    }

    /// Check that every assumption is finite and positive.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("screen_width_cm", self.screen_width_cm),
            ("screen_width_in", self.screen_width_in),
            ("synthetic_circle_radius_px", self.synthetic_circle_radius_px),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("calibration.{} must be > 0, got {}", name, value));
            }
        }
        Ok(())
    }
}
