/// Rejection of a calibration input.
///
/// Every variant is a retryable validation failure: the caller should
/// re-prompt the user instead of falling back to any default scale.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// An input value is NaN or infinite.
    NonFinite {
        /// Name of the offending input field.
        field: &'static str,
    },
    /// An input value that must be strictly positive is zero or negative.
    NonPositive {
        /// Name of the offending input field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Camera sensor geometry has a zero or non-finite dimension.
    InvalidSensor,
    /// Both blueprint points are at the same pixel location.
    CoincidentPoints,
    /// Declination is outside [-180, 180] degrees.
    DeclinationOutOfRange {
        /// The rejected value in degrees.
        degrees: f64,
    },
    /// Derived pixels-per-unit is non-finite, zero or negative.
    InvalidScale {
        /// The derived value.
        pixels_per_unit: f64,
    },
}

impl CalibrationError {
    /// Name of the input field the user should correct, if a single one applies.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NonFinite { field } | Self::NonPositive { field, .. } => Some(field),
            Self::DeclinationOutOfRange { .. } => Some("declination_deg"),
            Self::InvalidSensor | Self::CoincidentPoints | Self::InvalidScale { .. } => None,
        }
    }
}

impl std::fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite { field } => write!(f, "{} must be a finite number", field),
            Self::NonPositive { field, value } => {
                write!(f, "{} must be greater than zero, got {}", field, value)
            }
            Self::InvalidSensor => write!(
                f,
                "camera sensor width, focal length and image size must be positive"
            ),
            Self::CoincidentPoints => write!(f, "reference points must not coincide"),
            Self::DeclinationOutOfRange { degrees } => {
                write!(f, "declination {} deg is outside [-180, 180]", degrees)
            }
            Self::InvalidScale { pixels_per_unit } => {
                write!(f, "derived scale {} px/unit is not usable", pixels_per_unit)
            }
        }
    }
}

impl std::error::Error for CalibrationError {}

/// Require `value` to be finite and strictly positive.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, CalibrationError> {
    if !value.is_finite() {
        return Err(CalibrationError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(CalibrationError::NonPositive { field, value });
    }
    Ok(value)
}

/// Require every coordinate of a pixel point to be finite.
pub(crate) fn require_finite_point(
    field: &'static str,
    xy: [f64; 2],
) -> Result<[f64; 2], CalibrationError> {
    if xy.iter().all(|v| v.is_finite()) {
        Ok(xy)
    } else {
        Err(CalibrationError::NonFinite { field })
    }
}
