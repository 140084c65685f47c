//! In-progress rotation task

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace, warn};
use serde::Serialize;
use std::time::Instant;

// Internal
use super::{RotCtrlError, RotCtrlParams, SpinDir};
use crate::{drive::Drive, sensors::Sensors};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A rotation which has been started and is waiting for the heading to cross
/// its target.
///
/// The gyroscope heading accumulates without wrapping, so "target reached" is
/// a plain threshold crossing in the direction of the spin no matter how many
/// full turns the rotation covers.
#[derive(Debug)]
pub struct Rotation {
    /// Requested change in heading.
    ///
    /// Units: degrees, positive counterclockwise
    delta_deg: f32,

    /// Heading when the rotation started.
    ///
    /// Units: degrees
    start_deg: f32,

    /// Heading at which the rotation is complete.
    ///
    /// Units: degrees
    target_deg: f32,

    dir: SpinDir,

    start_instant: Instant,

    num_polls: u64,
}

/// Result of polling a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RotationStatus {
    /// The target has not been crossed yet, the drive is still spinning.
    InProgress {
        heading_deg: f32,
    },

    /// The target has been crossed and the drive stopped.
    Complete(RotationReport),
}

/// Summary of a completed rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RotationReport {
    pub delta_deg: f32,
    pub start_deg: f32,
    pub target_deg: f32,

    /// First heading which satisfied the target.
    pub final_deg: f32,

    /// Number of heading reads made after the spin was commanded.
    pub num_polls: u64,

    pub elapsed_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Rotation {
    /// Start a rotation by `delta_deg` degrees.
    ///
    /// Returns `Ok(None)` without touching the drive if `delta_deg` is zero.
    /// Otherwise the current heading is read, the target computed, and the
    /// spin matching the sign of `delta_deg` commanded.
    pub fn start(
        delta_deg: f32,
        sensors: &mut Sensors,
        drive: &mut Drive,
    ) -> Result<Option<Self>, RotCtrlError> {
        if !delta_deg.is_finite() {
            return Err(RotCtrlError::NonFiniteDelta(delta_deg));
        }

        let dir = match SpinDir::from_delta(delta_deg) {
            Some(d) => d,
            None => {
                debug!("Zero degree rotation requested, nothing to do");
                return Ok(None);
            }
        };

        let start_deg = sensors.read_angle();
        let target_deg = start_deg + delta_deg;

        match dir {
            SpinDir::Positive => drive.spin_positive(),
            SpinDir::Negative => drive.spin_negative(),
        }

        debug!(
            "Rotating {:+.1} deg ({:?}): {:.1} -> {:.1} deg",
            delta_deg, dir, start_deg, target_deg
        );

        Ok(Some(Self {
            delta_deg,
            start_deg,
            target_deg,
            dir,
            start_instant: Instant::now(),
            num_polls: 0,
        }))
    }

    /// Take one heading reading and check it against the target.
    ///
    /// The drive is stopped when the rotation completes or times out.
    pub fn poll(
        &mut self,
        sensors: &mut Sensors,
        drive: &mut Drive,
        params: &RotCtrlParams,
    ) -> Result<RotationStatus, RotCtrlError> {
        let heading_deg = sensors.read_angle();
        self.num_polls += 1;

        trace!(
            "Heading {:.2} deg, target {:.2} deg",
            heading_deg,
            self.target_deg
        );

        if self.is_target_reached(heading_deg) {
            drive.stop();

            let report = RotationReport {
                delta_deg: self.delta_deg,
                start_deg: self.start_deg,
                target_deg: self.target_deg,
                final_deg: heading_deg,
                num_polls: self.num_polls,
                elapsed_s: self.elapsed_s(),
            };

            debug!(
                "Rotation complete at {:.1} deg after {} polls ({:.3} s)",
                heading_deg, report.num_polls, report.elapsed_s
            );

            return Ok(RotationStatus::Complete(report));
        }

        if let Some(timeout_s) = params.timeout_s {
            let elapsed_s = self.elapsed_s();
            if elapsed_s > timeout_s {
                drive.stop();

                warn!(
                    "Rotation to {:.1} deg timed out at {:.1} deg",
                    self.target_deg, heading_deg
                );

                return Err(RotCtrlError::Timeout {
                    target_deg: self.target_deg,
                    heading_deg,
                    elapsed_s,
                });
            }
        }

        Ok(RotationStatus::InProgress { heading_deg })
    }

    /// Abandon the rotation, stopping the drive.
    pub fn cancel(self, drive: &mut Drive) {
        drive.stop();

        warn!(
            "Rotation to {:.1} deg cancelled after {} polls",
            self.target_deg, self.num_polls
        );
    }

    /// Determine if the given heading satisfies the target of this rotation.
    pub fn is_target_reached(&self, heading_deg: f32) -> bool {
        match self.dir {
            SpinDir::Positive => heading_deg >= self.target_deg,
            SpinDir::Negative => heading_deg <= self.target_deg,
        }
    }

    pub fn target_deg(&self) -> f32 {
        self.target_deg
    }

    pub fn dir(&self) -> SpinDir {
        self.dir
    }

    fn elapsed_s(&self) -> f64 {
        self.start_instant.elapsed().as_secs_f64()
    }
}
