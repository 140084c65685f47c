//! # Equipment interfaces
//!
//! Traits implemented by the robot's physical devices (or the simulation in
//! [`crate::sim`]). All device commands and reads are treated as always
//! succeeding, a disconnected device shows up as a read which never changes.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod color;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use color::Color;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A single drive motor.
pub trait Motor {
    /// Run the motor forwards at the current power level.
    fn forward(&mut self);

    /// Run the motor backwards at the current power level.
    fn backward(&mut self);

    /// Stop the motor.
    fn stop(&mut self);

    /// Set the power level of the motor, as a percentage between 0 and 100.
    fn set_power(&mut self, percent: u8);
}

/// Gyroscope reporting an accumulated heading.
pub trait Gyro {
    /// Arm the gyroscope in the given mode. Must be called before each read.
    fn set_mode(&mut self, mode: GyroMode);

    /// Take one angle sample.
    ///
    /// Units: degrees, unbounded (the heading accumulates and is not wrapped)
    fn read_angle_deg(&mut self) -> f32;
}

/// Ultrasonic ranging sensor.
pub trait RangeSensor {
    fn set_mode(&mut self, mode: RangeMode);

    /// Switch the ranging transmitter on.
    fn enable(&mut self);

    /// Take one distance sample.
    ///
    /// Units: meters
    fn read_distance_m(&mut self) -> f32;
}

/// Color sensor.
pub trait ColorSensor {
    fn set_mode(&mut self, mode: ColorMode);

    /// Take one sample of the raw color ID reported by the device.
    fn read_color_id(&mut self) -> i32;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// All devices owned by the robot.
///
/// The bundle is moved into the [`crate::state_mgr::StateMgr`] on construction and is never
/// shared afterwards.
pub struct Hardware {
    pub left_motor: Box<dyn Motor>,
    pub right_motor: Box<dyn Motor>,
    pub gyro: Box<dyn Gyro>,
    pub range: Box<dyn RangeSensor>,
    pub color: Box<dyn ColorSensor>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Gyroscope modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GyroMode {
    /// Accumulated angle
    Angle,
}

/// Ranging sensor modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeMode {
    /// Continuous distance measurement
    Distance,
}

/// Color sensor modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Report a color ID
    ColorId,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl GyroMode {
    /// Name of the mode as understood by the device driver.
    pub fn name(&self) -> &'static str {
        match self {
            GyroMode::Angle => "GYRO-ANG",
        }
    }
}

impl RangeMode {
    pub fn name(&self) -> &'static str {
        match self {
            RangeMode::Distance => "US-DIST-CM",
        }
    }
}

impl ColorMode {
    pub fn name(&self) -> &'static str {
        match self {
            ColorMode::ColorId => "COL-COLOR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names() {
        assert_eq!(GyroMode::Angle.name(), "GYRO-ANG");
        assert_eq!(RangeMode::Distance.name(), "US-DIST-CM");
        assert_eq!(ColorMode::ColorId.name(), "COL-COLOR");
    }
}
