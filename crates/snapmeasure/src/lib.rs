//! snapmeasure: measurement core for a photo-based measuring app.
//!
//! Two independent engines:
//!
//! 1. **Calibration**: converts a user-supplied reference (a coin in the
//!    photo, a map scale, drone altitude and sensor, or two blueprint points)
//!    into a validated pixels-per-millimetre [`Calibration`].
//! 2. **Alignment**: classifies a stream of device-orientation samples into
//!    tilt, stability, a `good`/`warning`/`bad` status, a bubble-level offset,
//!    guidance messages and haptic bursts.
//!
//! # Public API
//! - [`CalibrationEngine`] / [`compute_calibration`] and [`Calibration`]
//! - [`AlignmentClassifier`] and [`AlignmentResult`]
//! - [`EngineConfig`] for loading tuned thresholds from JSON
//! - reference catalogs ([`REFERENCE_OBJECTS`], [`DRONE_PRESETS`]) and
//!   [`Measurement`] conversion helpers
//!
//! Both engines are synchronous and free of I/O. Cameras, sensors, vibration
//! motors and rendering belong to the host.

pub mod alignment;
pub mod calibration;
mod camera;
mod catalog;
mod config;
mod measure;
mod units;

pub use alignment::{
    AlignmentClassifier, AlignmentConfig, AlignmentEvent, AlignmentResult, AlignmentStatus,
    BubbleOffset, DeviceOrientation, GuidanceMessage, HapticTimeline, OrientationSample,
    PulseKind,
};
pub use calibration::{
    compute_calibration, Calibration, CalibrationConfig, CalibrationEngine, CalibrationError,
    CalibrationInput, CalibrationSession, CalibrationSource, CalibrationType, ReferenceCircle,
};
pub use camera::CameraSensor;
pub use catalog::{
    drone_preset, reference_object, DronePreset, ReferenceObject, DRONE_PRESETS,
    REFERENCE_OBJECTS,
};
pub use config::{ConfigError, EngineConfig, CONFIG_SCHEMA_V1};
pub use measure::{MeasureError, Measurement};
pub use units::{LengthUnit, ScreenUnit, UnitParseError};
