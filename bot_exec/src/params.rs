//! # Robot Executable Parameters
//!
//! This module provide parameters for the robot executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct BotExecParams {
    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Time spent driving forward on each leg of the built-in square pattern.
    ///
    /// Units: seconds
    pub square_leg_s: f64,

    /// Number of legs driven by the built-in square pattern.
    pub square_num_legs: u32,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl BotExecParams {
    /// Number of cycles per second
    pub fn cycle_frequency_hz(&self) -> f64 {
        1.0 / self.cycle_period_s
    }
}

impl Default for BotExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.05,
            square_leg_s: 2.0,
            square_num_legs: 4,
        }
    }
}
