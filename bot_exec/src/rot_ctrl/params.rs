//! Parameters structure for RotCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Rotation control.
#[derive(Debug, Clone, Deserialize)]
pub struct RotCtrlParams {
    /// Time to sleep between heading polls of a blocking rotation. Zero polls
    /// as fast as the gyroscope can be read.
    ///
    /// Units: seconds
    #[serde(default)]
    pub poll_period_s: f64,

    /// Maximum time a rotation may take before it is abandoned. `None` waits
    /// forever.
    ///
    /// Units: seconds
    #[serde(default)]
    pub timeout_s: Option<f64>,
}

impl Default for RotCtrlParams {
    fn default() -> Self {
        Self {
            poll_period_s: 0.0,
            timeout_s: None,
        }
    }
}
