//! # Drive module
//!
//! Actuator facade over the two drive motors of the robot. Straight-line commands drive both
//! motors the same way, the two spin commands drive them in opposite directions to rotate the
//! robot on the spot:
//!
//! - `SpinPositive` - left backward, right forward (counterclockwise, heading increases)
//! - `SpinNegative` - left forward, right backward (clockwise, heading decreases)

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, trace};
use serde::Serialize;

use crate::eqpt::Motor;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Maximum motor power percentage.
pub const MAX_POWER_PCT: u8 = 100;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Actuator facade for the left and right drive motors.
pub struct Drive {
    left: Box<dyn Motor>,
    right: Box<dyn Motor>,

    /// The last demand sent to the motors.
    demand: DriveDemand,

    /// The last power level sent to the motors, `None` until [`Drive::set_power`] is called.
    power_pct: Option<u8>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Demands which can be issued to the drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DriveDemand {
    Stop,
    Forward,
    Backward,
    SpinPositive,
    SpinNegative,
}

#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error("Motor power must be between 0 and {}, found {0}", MAX_POWER_PCT)]
    InvalidPower(u8),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Drive {
    /// Create a new drive. The motors are not commanded until the first demand.
    pub fn new(left: Box<dyn Motor>, right: Box<dyn Motor>) -> Self {
        Self {
            left,
            right,
            demand: DriveDemand::Stop,
            power_pct: None,
        }
    }

    pub fn forward(&mut self) {
        self.left.forward();
        self.right.forward();
        self.set_demand(DriveDemand::Forward);
    }

    pub fn backward(&mut self) {
        self.left.backward();
        self.right.backward();
        self.set_demand(DriveDemand::Backward);
    }

    pub fn stop(&mut self) {
        self.left.stop();
        self.right.stop();
        self.set_demand(DriveDemand::Stop);
    }

    /// Spin in the positive (counterclockwise) direction.
    pub fn spin_positive(&mut self) {
        self.left.backward();
        self.right.forward();
        self.set_demand(DriveDemand::SpinPositive);
    }

    /// Spin in the negative (clockwise) direction.
    pub fn spin_negative(&mut self) {
        self.left.forward();
        self.right.backward();
        self.set_demand(DriveDemand::SpinNegative);
    }

    /// Set the power level of both motors.
    pub fn set_power(&mut self, percent: u8) -> Result<(), DriveError> {
        if percent > MAX_POWER_PCT {
            return Err(DriveError::InvalidPower(percent));
        }

        self.left.set_power(percent);
        self.right.set_power(percent);
        self.power_pct = Some(percent);

        debug!("Drive power set to {}%", percent);

        Ok(())
    }

    /// The last demand issued to the motors.
    pub fn demand(&self) -> DriveDemand {
        self.demand
    }

    /// The last power level issued to the motors.
    pub fn power_pct(&self) -> Option<u8> {
        self.power_pct
    }

    fn set_demand(&mut self, demand: DriveDemand) {
        trace!("Drive demand: {:?}", demand);
        self.demand = demand;
    }
}
