//! # State Manager Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::rot_ctrl::RotCtrlParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct StateMgrParams {
    /// Power level set on both drive motors at start up.
    ///
    /// Units: percent
    pub power_pct: u8,

    /// Rotation performed on entering `RotateLeft`.
    ///
    /// Units: degrees, counterclockwise
    pub rotate_left_deg: f32,

    /// Rotation performed on entering `RotateRight`.
    ///
    /// Units: degrees, clockwise
    pub rotate_right_deg: f32,

    #[serde(default)]
    pub rot_ctrl: RotCtrlParams,
}

impl Default for StateMgrParams {
    fn default() -> Self {
        Self {
            power_pct: 50,
            rotate_left_deg: 85.0,
            rotate_right_deg: 85.0,
            rot_ctrl: RotCtrlParams::default(),
        }
    }
}
