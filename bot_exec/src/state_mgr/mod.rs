//! # StateMgr module
//!
//! This module implements the [`StateMgr`] state machine, which holds the robot's current
//! behavioural state and performs each state's entry action when the state is entered:
//!
//! - `Idle` - stop the drive
//! - `Forward` - drive forward
//! - `Backward` - drive backward
//! - `RotateLeft` - rotate counterclockwise by `rotate_left_deg`
//! - `RotateRight` - rotate clockwise by `rotate_right_deg`
//! - `Ext` - no action, the state only records its entry time for the caller
//!
//! Rotations do not block [`StateMgr::enter`]. Entering a rotate state starts a
//! [`Rotation`](crate::rot_ctrl::Rotation) which is then advanced by [`StateMgr::step`] once per
//! cycle (or by [`StateMgr::run_to_completion`]). Entering any new state cancels an unfinished
//! rotation.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod state;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    thread,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;

pub use self::{
    params::StateMgrParams,
    state::{Family, StateTag},
};
use self::state::ActiveState;
use crate::{
    drive::{Drive, DriveDemand, DriveError},
    eqpt::Hardware,
    rot_ctrl::{RotCtrlError, Rotation, RotationReport, RotationStatus},
    sensors::Sensors,
};
use util::module::Module;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// State Manager
///
/// Owns the robot's hardware for the lifetime of the process. Construct one and pass it to
/// whatever decision process drives the robot.
pub struct StateMgr {
    params: StateMgrParams,

    sensors: Sensors,

    drive: Drive,

    /// The current state and its entry time.
    active: ActiveState,

    /// The rotation started by the current state, if it has not finished yet.
    rotation: Option<Rotation>,

    /// The most recently completed rotation.
    last_rotation: Option<RotationReport>,
}

/// Data required to initialise the [`StateMgr`].
pub struct InitData {
    pub params: StateMgrParams,
    pub hardware: Hardware,
    pub initial: StateTag,
}

/// Input data to the StateMgr.
#[derive(Debug, Default)]
pub struct InputData {
    /// The state to enter on this cycle, or `None` to remain in the current state.
    pub request: Option<StateTag>,
}

/// Status report for StateMgr processing.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub state: StateTag,
    pub generation: u64,
    pub entered_at: DateTime<Utc>,
    pub time_in_state_s: f64,
    pub drive_demand: DriveDemand,
    pub rotation_target_deg: Option<f32>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors that can occur in the state manager.
#[derive(Debug, thiserror::Error)]
pub enum StateMgrError {
    #[error("Invalid StateMgr parameter {name}: {value}")]
    InvalidParams { name: &'static str, value: f64 },

    #[error("Drive error: {0}")]
    DriveError(#[from] DriveError),

    #[error("Error in RotCtrl: {0}")]
    RotCtrlError(#[from] RotCtrlError),
}

/// What happened when a state was entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryOutcome {
    /// The entry action is complete.
    Done,

    /// A rotation has been started and must be advanced with [`StateMgr::step`].
    RotationStarted { target_deg: f32 },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl StateMgr {
    /// Create the state manager, set the drive power, and enter the `initial` state.
    pub fn new(
        params: StateMgrParams,
        hardware: Hardware,
        initial: StateTag,
    ) -> Result<Self, StateMgrError> {
        check_params(&params)?;

        let mut drive = Drive::new(hardware.left_motor, hardware.right_motor);
        drive.set_power(params.power_pct)?;

        info!("StateMgr initial state: {}", initial.family);

        let mut mgr = Self {
            params,
            sensors: Sensors::new(hardware.gyro, hardware.range, hardware.color),
            drive,
            active: ActiveState::new(initial, 0),
            rotation: None,
            last_rotation: None,
        };

        mgr.perform_entry_action()?;

        Ok(mgr)
    }

    /// Enter a new state and perform its entry action.
    ///
    /// Re-entering a state with the same tag is allowed and resets the entry time. Any
    /// unfinished rotation is cancelled first.
    pub fn enter(&mut self, tag: StateTag) -> Result<EntryOutcome, StateMgrError> {
        if let Some(rotation) = self.rotation.take() {
            rotation.cancel(&mut self.drive);
        }

        self.active = ActiveState::new(tag, self.active.generation + 1);

        info!("StateMgr state change to: {}", self.active.tag.family);

        self.perform_entry_action()
    }

    /// Advance the current rotation by one heading poll.
    ///
    /// Returns `None` if no rotation is in progress. A rotation which times out is dropped with
    /// the drive stopped, the state itself is left unchanged.
    pub fn step(&mut self) -> Result<Option<RotationStatus>, StateMgrError> {
        let rotation = match self.rotation.as_mut() {
            Some(r) => r,
            None => return Ok(None),
        };

        match rotation.poll(&mut self.sensors, &mut self.drive, &self.params.rot_ctrl) {
            Ok(RotationStatus::Complete(report)) => {
                self.rotation = None;
                self.last_rotation = Some(report);
                Ok(Some(RotationStatus::Complete(report)))
            }
            Ok(status) => Ok(Some(status)),
            Err(e) => {
                self.rotation = None;
                Err(e.into())
            }
        }
    }

    /// Poll the current rotation until it completes.
    ///
    /// Returns the rotation report, or `None` if there was no rotation in progress.
    pub fn run_to_completion(&mut self) -> Result<Option<RotationReport>, StateMgrError> {
        let poll_period_s = self.params.rot_ctrl.poll_period_s;

        loop {
            match self.step()? {
                None => return Ok(None),
                Some(RotationStatus::Complete(report)) => return Ok(Some(report)),
                Some(RotationStatus::InProgress { .. }) => {
                    if poll_period_s > 0.0 {
                        thread::sleep(Duration::from_secs_f64(poll_period_s));
                    }
                }
            }
        }
    }

    /// Enter a state and wait for its entry action to finish, including any rotation.
    pub fn enter_blocking(
        &mut self,
        tag: StateTag,
    ) -> Result<Option<RotationReport>, StateMgrError> {
        self.enter(tag)?;
        self.run_to_completion()
    }

    /// Cancel the current rotation, stopping the drive. Returns `false` if there was no rotation
    /// in progress.
    pub fn cancel_rotation(&mut self) -> bool {
        match self.rotation.take() {
            Some(rotation) => {
                rotation.cancel(&mut self.drive);
                true
            }
            None => false,
        }
    }

    pub fn current_state(&self) -> &StateTag {
        &self.active.tag
    }

    /// Number of states entered before the current one.
    pub fn generation(&self) -> u64 {
        self.active.generation
    }

    /// Instant at which the current state was entered.
    pub fn entered_at(&self) -> Instant {
        self.active.entered_at
    }

    pub fn time_in_current_state(&self) -> Duration {
        self.active.entered_at.elapsed()
    }

    /// True while a rotation started by the current state is unfinished.
    pub fn is_rotating(&self) -> bool {
        self.rotation.is_some()
    }

    pub fn last_rotation(&self) -> Option<&RotationReport> {
        self.last_rotation.as_ref()
    }

    pub fn drive(&self) -> &Drive {
        &self.drive
    }

    /// The robot's sensors, for reads by the decision process.
    pub fn sensors(&mut self) -> &mut Sensors {
        &mut self.sensors
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            state: self.active.tag.clone(),
            generation: self.active.generation,
            entered_at: self.active.entered_at_utc,
            time_in_state_s: self.time_in_current_state().as_secs_f64(),
            drive_demand: self.drive.demand(),
            rotation_target_deg: self.rotation.as_ref().map(|r| r.target_deg()),
        }
    }

    /// Perform the one-shot action of the active state.
    fn perform_entry_action(&mut self) -> Result<EntryOutcome, StateMgrError> {
        let delta_deg = match self.active.tag.family {
            Family::Idle => {
                self.drive.stop();
                return Ok(EntryOutcome::Done);
            }
            Family::Forward => {
                self.drive.forward();
                return Ok(EntryOutcome::Done);
            }
            Family::Backward => {
                self.drive.backward();
                return Ok(EntryOutcome::Done);
            }
            Family::RotateLeft => self.params.rotate_left_deg,
            // Clockwise is the negative direction
            Family::RotateRight => -self.params.rotate_right_deg,
            Family::Ext => {
                debug!("No entry action for {}", self.active.tag);
                return Ok(EntryOutcome::Done);
            }
        };

        match Rotation::start(delta_deg, &mut self.sensors, &mut self.drive)? {
            Some(rotation) => {
                let target_deg = rotation.target_deg();
                self.rotation = Some(rotation);
                Ok(EntryOutcome::RotationStarted { target_deg })
            }
            None => Ok(EntryOutcome::Done),
        }
    }
}

/// Reject parameters which would only fail once a state is entered.
///
/// Rotation angles must be finite so that entering a rotate state cannot fail after the state
/// has been committed.
fn check_params(params: &StateMgrParams) -> Result<(), StateMgrError> {
    let rot_ctrl = &params.rot_ctrl;

    let finite = [
        ("rotate_left_deg", params.rotate_left_deg as f64),
        ("rotate_right_deg", params.rotate_right_deg as f64),
    ];
    for &(name, value) in finite.iter() {
        if !value.is_finite() {
            return Err(StateMgrError::InvalidParams { name, value });
        }
    }

    if !(rot_ctrl.poll_period_s.is_finite() && rot_ctrl.poll_period_s >= 0.0) {
        return Err(StateMgrError::InvalidParams {
            name: "rot_ctrl.poll_period_s",
            value: rot_ctrl.poll_period_s,
        });
    }

    if let Some(timeout_s) = rot_ctrl.timeout_s {
        if timeout_s.is_nan() || timeout_s < 0.0 {
            return Err(StateMgrError::InvalidParams {
                name: "rot_ctrl.timeout_s",
                value: timeout_s,
            });
        }
    }

    Ok(())
}

impl Module for StateMgr {
    type InitData = InitData;
    type InitError = StateMgrError;

    type InputData = InputData;
    type OutputData = Option<RotationStatus>;
    type StatusReport = StatusReport;
    type ProcError = StateMgrError;

    fn init(init_data: Self::InitData) -> Result<Self, Self::InitError> {
        Self::new(init_data.params, init_data.hardware, init_data.initial)
    }

    /// Enter the requested state, if any, then advance the current rotation by one poll.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        if let Some(ref tag) = input_data.request {
            self.enter(tag.clone())?;
        }

        let output = self.step()?;

        Ok((output, self.status()))
    }
}
