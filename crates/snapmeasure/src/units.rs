//! Closed set of length units understood by the calibration engine.
//!
//! Every calibration is stored in millimetres. Other units only appear at the
//! input boundary (entered distances) and the output boundary (formatted
//! measurements).

use serde::{Deserialize, Serialize};

/// Linear length unit with a fixed conversion factor to millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    #[serde(rename = "mm")]
    Millimeter,
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "in")]
    Inch,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "ft")]
    Foot,
    #[serde(rename = "km")]
    Kilometer,
    #[serde(rename = "mi")]
    Mile,
}

impl LengthUnit {
    /// All supported units, smallest first.
    pub const ALL: [LengthUnit; 7] = [
        Self::Millimeter,
        Self::Centimeter,
        Self::Inch,
        Self::Foot,
        Self::Meter,
        Self::Kilometer,
        Self::Mile,
    ];

    /// Millimetres in one unit.
    pub fn mm_per_unit(self) -> f64 {
        match self {
            Self::Millimeter => 1.0,
            Self::Centimeter => 10.0,
            Self::Inch => 25.4,
            Self::Meter => 1_000.0,
            Self::Foot => 304.8,
            Self::Kilometer => 1_000_000.0,
            Self::Mile => 1_609_344.0,
        }
    }

    /// Convert a value in this unit to millimetres.
    pub fn to_mm(self, value: f64) -> f64 {
        value * self.mm_per_unit()
    }

    /// Convert a millimetre value into this unit.
    pub fn from_mm(self, value_mm: f64) -> f64 {
        value_mm / self.mm_per_unit()
    }

    /// Short display symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Inch => "in",
            Self::Meter => "m",
            Self::Foot => "ft",
            Self::Kilometer => "km",
            Self::Mile => "mi",
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unit symbol that does not name a [`LengthUnit`] or [`ScreenUnit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitParseError {
    /// The rejected input, trimmed.
    pub input: String,
}

impl std::fmt::Display for UnitParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown length unit '{}'", self.input)
    }
}

impl std::error::Error for UnitParseError {}

impl std::str::FromStr for LengthUnit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let unit = match key.as_str() {
            "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => {
                Self::Millimeter
            }
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => {
                Self::Centimeter
            }
            "in" | "inch" | "inches" | "\"" => Self::Inch,
            "m" | "meter" | "meters" | "metre" | "metres" => Self::Meter,
            "ft" | "foot" | "feet" | "'" => Self::Foot,
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Self::Kilometer,
            "mi" | "mile" | "miles" => Self::Mile,
            _ => {
                return Err(UnitParseError {
                    input: s.trim().to_string(),
                })
            }
        };
        Ok(unit)
    }
}

/// Unit the user measures an on-screen distance in (verbal scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenUnit {
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "in")]
    Inch,
}

impl ScreenUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Centimeter => "cm",
            Self::Inch => "in",
        }
    }
}

impl std::fmt::Display for ScreenUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for ScreenUnit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => {
                Ok(Self::Centimeter)
            }
            "in" | "inch" | "inches" => Ok(Self::Inch),
            _ => Err(UnitParseError {
                input: s.trim().to_string(),
            }),
        }
    }
}
