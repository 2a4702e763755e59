//! Pixel-to-real-world calibration across four input modalities.
//!
//! Each modality is an independent pure function producing a validated
//! [`Calibration`] in pixels per millimetre:
//!
//! - [`coin`]: circle around a reference object of known diameter.
//! - [`verbal`]: "N cm on screen = M km in reality" map scales.
//! - [`drone`]: altitude plus camera sensor geometry (ground sample distance).
//! - [`blueprint`]: two points with a known real distance between them.
//!
//! [`CalibrationEngine`] dispatches a [`CalibrationInput`] to the matching
//! modality. A non-finite or non-positive scale is always rejected; no
//! fallback scale is ever substituted.

pub mod blueprint;
pub mod coin;
mod config;
pub mod drone;
mod error;
mod session;
mod types;
pub mod verbal;

use serde::{Deserialize, Serialize};

pub use blueprint::BlueprintInput;
pub use coin::CoinInput;
pub use config::CalibrationConfig;
pub use drone::DroneInput;
pub use error::CalibrationError;
pub use session::CalibrationSession;
pub use types::{Calibration, CalibrationSource, CalibrationType, ReferenceCircle};
pub use verbal::VerbalScaleInput;

/// One calibration request from the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalibrationInput {
    Coin(CoinInput),
    Verbal(VerbalScaleInput),
    Drone(DroneInput),
    Blueprint(BlueprintInput),
}

impl CalibrationInput {
    pub fn calibration_type(&self) -> CalibrationType {
        match self {
            Self::Coin(_) => CalibrationType::Coin,
            Self::Verbal(_) => CalibrationType::Verbal,
            Self::Drone(_) => CalibrationType::Drone,
            Self::Blueprint(_) => CalibrationType::Blueprint,
        }
    }
}

/// Dispatches calibration inputs under a fixed [`CalibrationConfig`].
///
/// Stateless apart from its configuration; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct CalibrationEngine {
    config: CalibrationConfig,
}

impl CalibrationEngine {
    /// Build an engine from `config` as given; see [`try_new`](Self::try_new).
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// Build an engine, rejecting non-finite or non-positive assumptions.
    pub fn try_new(config: CalibrationConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Compute a calibration, or reject the input.
    pub fn compute(&self, input: &CalibrationInput) -> Result<Calibration, CalibrationError> {
        let result = match input {
            CalibrationInput::Coin(coin) => coin::calibrate(coin),
            CalibrationInput::Verbal(verbal) => verbal::calibrate(verbal, &self.config),
            CalibrationInput::Drone(drone) => drone::calibrate(drone, &self.config),
            CalibrationInput::Blueprint(blueprint) => blueprint::calibrate(blueprint),
        };

        match &result {
            Ok(cal) => tracing::info!(
                kind = %cal.calibration_type(),
                pixels_per_unit = cal.pixels_per_unit(),
                unit = %cal.unit(),
                "calibration accepted"
            ),
            Err(e) => tracing::warn!(
                kind = %input.calibration_type(),
                "calibration rejected: {}",
                e
            ),
        }
        result
    }
}

/// Compute a calibration with the default configuration.
pub fn compute_calibration(input: &CalibrationInput) -> Result<Calibration, CalibrationError> {
    CalibrationEngine::default().compute(input)
}
