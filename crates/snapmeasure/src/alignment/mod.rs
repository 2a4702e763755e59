//! Capture-readiness classification from device orientation samples.
//!
//! Per sample the classifier:
//!
//! 1. **Smooths** beta/gamma with an exponential moving average.
//! 2. **Orients**: flat (horizontal) vs upright (vertical) capture.
//! 3. **Measures tilt** from flat, or from upright ignoring gamma.
//! 4. **Tracks history** of tilt and acceleration magnitude in fixed windows.
//! 5. **Classifies** stability and `good`/`warning`/`bad` status.
//! 6. **Guides** the user with at most one message, reported on change only.
//! 7. **Schedules haptics** on status transitions, cancelling stale pulses.
//!
//! Windows and thresholds are counted in samples and physical units, never in
//! wall-clock time, so behaviour does not depend on the sensor rate.

mod classifier;
mod config;
mod guidance;
mod haptics;
mod types;
mod window;

pub use classifier::{AlignmentClassifier, AlignmentEvent, MAX_PENDING_EVENTS};
pub use config::{AlignmentConfig, GuidanceConfig, HapticConfig, StatusGate};
pub use guidance::{GuidanceMessage, TiltCorrection};
pub use haptics::{HapticPulse, HapticTimeline, PulseKind, ScheduledPulse};
pub use types::{
    AlignmentResult, AlignmentStatus, BubbleOffset, DeviceOrientation, OrientationSample,
};

#[cfg(test)]
mod tests;
