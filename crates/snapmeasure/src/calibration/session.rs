use super::error::CalibrationError;
use super::types::Calibration;
use super::{CalibrationEngine, CalibrationInput};

/// Holds the single active calibration of a photo session.
///
/// A successful recalibration replaces the active record; a rejected one
/// leaves it untouched. Retaking the photo drops it.
#[derive(Debug, Default)]
pub struct CalibrationSession {
    active: Option<Calibration>,
    revision: u64,
}

impl CalibrationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The calibration measurements must use, if any.
    pub fn active(&self) -> Option<&Calibration> {
        self.active.as_ref()
    }

    /// Number of calibrations accepted since the session started.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Compute and activate a calibration from `input`.
    pub fn calibrate(
        &mut self,
        engine: &CalibrationEngine,
        input: &CalibrationInput,
    ) -> Result<&Calibration, CalibrationError> {
        let calibration = engine.compute(input)?;
        Ok(self.replace(calibration))
    }

    /// Activate an already validated calibration.
    pub fn replace(&mut self, calibration: Calibration) -> &Calibration {
        self.revision += 1;
        tracing::debug!(
            revision = self.revision,
            kind = %calibration.calibration_type(),
            "calibration activated"
        );
        self.active.insert(calibration)
    }

    /// Drop the active calibration because the photo was retaken.
    pub fn retake(&mut self) -> Option<Calibration> {
        self.active.take()
    }
}
