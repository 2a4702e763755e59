//! Built-in reference tables: coin diameters and drone camera geometry.

use crate::calibration::{CoinInput, DroneInput};
use crate::camera::CameraSensor;

/// A physical object of known diameter usable as a coin reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceObject {
    pub key: &'static str,
    pub name: &'static str,
    pub diameter_mm: f64,
}

impl ReferenceObject {
    /// Build a coin calibration input for a circle drawn around this object.
    pub fn coin_input(&self, center_px: [f64; 2], radius_px: f64) -> CoinInput {
        CoinInput {
            center_px,
            radius_px,
            known_diameter_mm: self.diameter_mm,
            reference: Some(self.key.to_string()),
        }
    }
}

/// Camera geometry of a drone model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DronePreset {
    pub key: &'static str,
    pub name: &'static str,
    pub sensor: CameraSensor,
}

impl DronePreset {
    pub fn drone_input(&self, altitude_m: f64) -> DroneInput {
        DroneInput {
            sensor: self.sensor,
            altitude_m,
        }
    }
}

const fn coin_ref(key: &'static str, name: &'static str, diameter_mm: f64) -> ReferenceObject {
    ReferenceObject {
        key,
        name,
        diameter_mm,
    }
}

const fn drone_cam(
    key: &'static str,
    name: &'static str,
    sensor_width_mm: f64,
    focal_length_mm: f64,
    image_size_px: [u32; 2],
) -> DronePreset {
    DronePreset {
        key,
        name,
        sensor: CameraSensor {
            sensor_width_mm,
            focal_length_mm,
            image_width_px: image_size_px[0],
            image_height_px: image_size_px[1],
        },
    }
}

pub const REFERENCE_OBJECTS: &[ReferenceObject] = &[
    coin_ref("us_penny", "US penny", 19.05),
    coin_ref("us_nickel", "US nickel", 21.21),
    coin_ref("us_dime", "US dime", 17.91),
    coin_ref("us_quarter", "US quarter", 24.26),
    coin_ref("euro_1c", "1 euro cent", 16.25),
    coin_ref("euro_10c", "10 euro cent", 19.75),
    coin_ref("euro_50c", "50 euro cent", 24.25),
    coin_ref("euro_1", "1 euro", 23.25),
    coin_ref("euro_2", "2 euro", 25.75),
    coin_ref("uk_1p", "UK 1 penny", 20.32),
    coin_ref("uk_1_pound", "UK 1 pound", 23.43),
    coin_ref("ca_quarter", "Canadian quarter", 23.88),
    coin_ref("ca_loonie", "Canadian loonie", 26.50),
    coin_ref("jp_100_yen", "100 yen", 22.60),
];

pub const DRONE_PRESETS: &[DronePreset] = &[
    drone_cam("dji_mini_2", "DJI Mini 2", 6.3, 4.5, [4000, 3000]),
    drone_cam("dji_air_2s", "DJI Air 2S", 13.2, 8.38, [5472, 3648]),
    drone_cam("dji_mavic_3", "DJI Mavic 3", 17.3, 12.29, [5280, 3956]),
    drone_cam("dji_phantom_4_pro", "DJI Phantom 4 Pro", 13.2, 8.8, [5472, 3648]),
];

/// Look up a reference object by key (case-insensitive).
pub fn reference_object(key: &str) -> Option<&'static ReferenceObject> {
    REFERENCE_OBJECTS
        .iter()
        .find(|r| r.key.eq_ignore_ascii_case(key.trim()))
}

/// Look up a drone preset by key (case-insensitive).
pub fn drone_preset(key: &str) -> Option<&'static DronePreset> {
    DRONE_PRESETS
        .iter()
        .find(|d| d.key.eq_ignore_ascii_case(key.trim()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use approx::assert_relative_eq;

    use super::*;
    use crate::calibration::{coin, drone, CalibrationConfig};

    #[test]
    fn keys_are_unique_and_entries_valid() {
        let mut keys = HashSet::new();
        for r in REFERENCE_OBJECTS {
            assert!(keys.insert(r.key), "duplicate key {}", r.key);
            assert!(r.diameter_mm > 0.0);
        }
        for d in DRONE_PRESETS {
            assert!(keys.insert(d.key), "duplicate key {}", d.key);
            assert!(d.sensor.is_valid(), "{}", d.key);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_relative_eq!(reference_object("US_Quarter").unwrap().diameter_mm, 24.26);
        assert!(reference_object("doubloon").is_none());
        assert!(drone_preset(" dji_mini_2 ").is_some());
    }

    #[test]
    fn catalog_entries_feed_calibration() {
        let quarter = reference_object("us_quarter").unwrap();
        let cal = coin::calibrate(&quarter.coin_input([0.0, 0.0], 24.26)).unwrap();
        assert_relative_eq!(cal.pixels_per_unit(), 2.0, epsilon = 1e-12);

        let mini = drone_preset("dji_mini_2").unwrap();
        let cal = drone::calibrate(&mini.drone_input(50.0), &CalibrationConfig::default()).unwrap();
        assert_relative_eq!(cal.mm_per_pixel(), 17.5, epsilon = 1e-9);
    }
}
