//! Parameters for the simulated robot

use serde::Deserialize;

/// Parameters for the simulated robot.
#[derive(Debug, Clone, Deserialize)]
pub struct SimParams {
    /// Gyroscope heading at start up.
    ///
    /// Units: degrees
    pub initial_heading_deg: f32,

    /// Heading change per gyroscope read while the robot is spinning.
    ///
    /// Units: degrees/read
    pub turn_rate_deg_per_read: f32,

    /// Distance reported by the ranging sensor.
    ///
    /// Units: meters
    pub distance_m: f32,

    /// Raw color ID reported by the color sensor.
    pub color_id: i32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            initial_heading_deg: 0.0,
            turn_rate_deg_per_read: 1.0,
            distance_m: 1.0,
            color_id: 1,
        }
    }
}
