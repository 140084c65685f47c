//! # Robot library.
//!
//! This library allows the executable, and any other crate in the workspace, to access the items
//! defined inside the bot crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Equipment - traits the robot's motors and sensors must implement
pub mod eqpt;

/// Sensor facade - arms each sensor's mode and takes a single reading
pub mod sensors;

/// Drive - issues symmetric and spin commands to both motors
pub mod drive;

/// Rotation control module - closed-loop rotation on the spot using the gyroscope
pub mod rot_ctrl;

/// State manager - the robot's behavioural state machine
pub mod state_mgr;

/// Simulated robot
pub mod sim;

/// Executable parameters
pub mod params;
