//! # Rotation control module
//!
//! Closed-loop rotation on the spot. A rotation commands one of the drive's spin demands and
//! polls the gyroscope until the accumulated heading crosses `start + delta`, then stops.
//!
//! Rotations can be run in two ways:
//!
//! - Stepped: [`Rotation::start`] followed by one [`Rotation::poll`] per cycle, which lets the
//!   caller cancel or bound the rotation. This is what the state manager uses.
//! - Blocking: [`rotate`] and its clockwise/counterclockwise wrappers, which poll until the
//!   rotation completes or times out.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod rotation;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::{thread, time::Duration};

// Internal
pub use params::*;
pub use rotation::*;
use crate::{drive::Drive, sensors::Sensors};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Spin direction of a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpinDir {
    /// Counterclockwise, heading increases
    Positive,
    /// Clockwise, heading decreases
    Negative,
}

/// Possible errors that can occur during RotCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum RotCtrlError {
    #[error("Rotation angle must be finite, found {0}")]
    NonFiniteDelta(f32),

    #[error(
        "Rotation timed out after {elapsed_s:.3} s: target {target_deg:.1} deg, \
        heading {heading_deg:.1} deg"
    )]
    Timeout {
        target_deg: f32,
        heading_deg: f32,
        elapsed_s: f64,
    },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SpinDir {
    /// Direction required to rotate by `delta_deg`, `None` for a zero rotation.
    pub fn from_delta(delta_deg: f32) -> Option<Self> {
        if delta_deg > 0.0 {
            Some(SpinDir::Positive)
        } else if delta_deg < 0.0 {
            Some(SpinDir::Negative)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Rotate by `delta_deg` degrees (positive counterclockwise), blocking until
/// the rotation completes.
///
/// Returns `Ok(None)` for a zero rotation, in which case the drive is not
/// commanded. The drive is stopped on every other exit path.
pub fn rotate(
    delta_deg: f32,
    sensors: &mut Sensors,
    drive: &mut Drive,
    params: &RotCtrlParams,
) -> Result<Option<RotationReport>, RotCtrlError> {
    let mut rotation = match Rotation::start(delta_deg, sensors, drive)? {
        Some(r) => r,
        None => return Ok(None),
    };

    loop {
        if let RotationStatus::Complete(report) = rotation.poll(sensors, drive, params)? {
            return Ok(Some(report));
        }

        if params.poll_period_s > 0.0 {
            thread::sleep(Duration::from_secs_f64(params.poll_period_s));
        }
    }
}

/// Rotate clockwise by `degrees`.
///
/// `degrees` should be non-negative, a negative value is negated again and
/// rotates counterclockwise.
pub fn rotate_clockwise(
    degrees: f32,
    sensors: &mut Sensors,
    drive: &mut Drive,
    params: &RotCtrlParams,
) -> Result<Option<RotationReport>, RotCtrlError> {
    rotate(-degrees, sensors, drive, params)
}

/// Rotate counterclockwise by `degrees`.
///
/// `degrees` should be non-negative, a negative value rotates clockwise.
pub fn rotate_counterclockwise(
    degrees: f32,
    sensors: &mut Sensors,
    drive: &mut Drive,
    params: &RotCtrlParams,
) -> Result<Option<RotationReport>, RotCtrlError> {
    rotate(degrees, sensors, drive, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{MotorCmd, MotorEvent, Side, SimParams, SimRover};
    use proptest::prelude::*;

    fn rig(initial_heading_deg: f32, turn_rate_deg_per_read: f32) -> (SimRover, Sensors, Drive) {
        let sim = SimRover::new(&SimParams {
            initial_heading_deg,
            turn_rate_deg_per_read,
            ..Default::default()
        });
        let hw = sim.hardware();
        let sensors = Sensors::new(hw.gyro, hw.range, hw.color);
        let drive = Drive::new(hw.left_motor, hw.right_motor);
        (sim, sensors, drive)
    }

    fn ev(side: Side, cmd: MotorCmd) -> MotorEvent {
        MotorEvent { side, cmd }
    }

    fn spin_positive_events() -> Vec<MotorEvent> {
        vec![ev(Side::Left, MotorCmd::Backward), ev(Side::Right, MotorCmd::Forward)]
    }

    fn spin_negative_events() -> Vec<MotorEvent> {
        vec![ev(Side::Left, MotorCmd::Forward), ev(Side::Right, MotorCmd::Backward)]
    }

    fn stop_events() -> Vec<MotorEvent> {
        vec![ev(Side::Left, MotorCmd::Stop), ev(Side::Right, MotorCmd::Stop)]
    }

    #[test]
    fn test_zero_is_noop() {
        let (sim, mut sensors, mut drive) = rig(10.0, 1.0);

        let report = rotate(0.0, &mut sensors, &mut drive, &RotCtrlParams::default()).unwrap();

        assert!(report.is_none());
        assert!(sim.events().is_empty());
        assert_eq!(sim.num_angle_reads(), 0);

        // Negative zero is still zero
        assert!(rotate(-0.0, &mut sensors, &mut drive, &RotCtrlParams::default())
            .unwrap()
            .is_none());
        assert!(sim.events().is_empty());
    }

    #[test]
    fn test_non_finite_rejected() {
        let (sim, mut sensors, mut drive) = rig(0.0, 1.0);

        for delta in &[std::f32::NAN, std::f32::INFINITY, std::f32::NEG_INFINITY] {
            let r = rotate(*delta, &mut sensors, &mut drive, &RotCtrlParams::default());
            assert!(matches!(r, Err(RotCtrlError::NonFiniteDelta(_))));
        }
        assert!(sim.events().is_empty());
    }

    #[test]
    fn test_positive_rotation() {
        let (sim, mut sensors, mut drive) = rig(10.0, 1.0);

        let report = rotate(85.0, &mut sensors, &mut drive, &RotCtrlParams::default())
            .unwrap()
            .unwrap();

        assert_eq!(report.start_deg, 10.0);
        assert_eq!(report.target_deg, 95.0);
        assert_eq!(report.final_deg, 95.0);
        assert_eq!(report.num_polls, 85);

        let mut expected = spin_positive_events();
        expected.extend(stop_events());
        assert_eq!(sim.events(), expected);
        assert!(sim.is_stopped());

        // One read for the start heading plus one per poll
        assert_eq!(sim.num_angle_reads(), 86);
        assert_eq!(sim.num_unarmed_reads(), 0);
    }

    #[test]
    fn test_negative_rotation() {
        let (sim, mut sensors, mut drive) = rig(0.0, 2.5);

        let report = rotate(-20.0, &mut sensors, &mut drive, &RotCtrlParams::default())
            .unwrap()
            .unwrap();

        assert_eq!(report.target_deg, -20.0);
        assert!(report.final_deg <= -20.0);
        assert_eq!(report.num_polls, 8);

        let mut expected = spin_negative_events();
        expected.extend(stop_events());
        assert_eq!(sim.events(), expected);
    }

    #[test]
    fn test_first_poll_already_past_target() {
        let (sim, mut sensors, mut drive) = rig(0.0, 100.0);

        let report = rotate(5.0, &mut sensors, &mut drive, &RotCtrlParams::default())
            .unwrap()
            .unwrap();

        assert_eq!(report.num_polls, 1);
        assert_eq!(report.final_deg, 100.0);
        assert!(sim.is_stopped());
        assert_eq!(sim.events().len(), 4);
    }

    #[test]
    fn test_multiple_turns_no_wrapping() {
        let (sim, mut sensors, mut drive) = rig(350.0, 7.0);

        let report = rotate(-1000.0, &mut sensors, &mut drive, &RotCtrlParams::default())
            .unwrap()
            .unwrap();

        assert_eq!(report.target_deg, -650.0);
        assert!(report.final_deg <= -650.0);
        assert!(report.final_deg > -657.0);
        assert!(sim.is_stopped());
    }

    #[test]
    fn test_direction_wrappers() {
        let (sim, mut sensors, mut drive) = rig(0.0, 1.0);
        let params = RotCtrlParams::default();

        let r = rotate_clockwise(30.0, &mut sensors, &mut drive, &params).unwrap().unwrap();
        assert_eq!(r.delta_deg, -30.0);
        assert_eq!(sim.heading_deg(), -30.0);

        let r = rotate_counterclockwise(30.0, &mut sensors, &mut drive, &params).unwrap().unwrap();
        assert_eq!(r.delta_deg, 30.0);
        assert_eq!(sim.heading_deg(), 0.0);

        // A negative magnitude is negated again, not rejected
        sim.clear_events();
        let r = rotate_clockwise(-10.0, &mut sensors, &mut drive, &params).unwrap().unwrap();
        assert_eq!(r.delta_deg, 10.0);
        assert_eq!(sim.heading_deg(), 10.0);
        assert_eq!(sim.events()[..2], spin_positive_events()[..]);
    }

    #[test]
    fn test_timeout_stops_drive() {
        let (sim, mut sensors, mut drive) = rig(0.0, 1.0);
        sim.set_gyro_stalled(true);

        let params = RotCtrlParams {
            poll_period_s: 0.001,
            timeout_s: Some(0.01),
        };

        let r = rotate(45.0, &mut sensors, &mut drive, &params);

        match r {
            Err(RotCtrlError::Timeout { target_deg, heading_deg, elapsed_s }) => {
                assert_eq!(target_deg, 45.0);
                assert_eq!(heading_deg, 0.0);
                assert!(elapsed_s > 0.01);
            }
            r => panic!("Expected a timeout, got {:?}", r),
        }
        assert!(sim.is_stopped());
    }

    #[test]
    fn test_stepped_rotation_and_cancel() {
        let (sim, mut sensors, mut drive) = rig(0.0, 1.0);
        let params = RotCtrlParams::default();

        let mut rotation = Rotation::start(10.0, &mut sensors, &mut drive).unwrap().unwrap();
        assert_eq!(rotation.target_deg(), 10.0);
        assert_eq!(rotation.dir(), SpinDir::Positive);

        for i in 1..=3 {
            let status = rotation.poll(&mut sensors, &mut drive, &params).unwrap();
            assert_eq!(status, RotationStatus::InProgress { heading_deg: i as f32 });
        }
        assert!(!sim.is_stopped());

        rotation.cancel(&mut drive);
        assert!(sim.is_stopped());
        assert_eq!(sim.heading_deg(), 3.0);
    }

    #[test]
    fn test_spin_dir_from_delta() {
        assert_eq!(SpinDir::from_delta(1.0), Some(SpinDir::Positive));
        assert_eq!(SpinDir::from_delta(-0.5), Some(SpinDir::Negative));
        assert_eq!(SpinDir::from_delta(0.0), None);
        assert_eq!(SpinDir::from_delta(std::f32::NAN), None);
    }

    proptest! {
        #[test]
        fn rotation_terminates_past_target(
            start in -720.0f32..720.0,
            magnitude in 0.5f32..400.0,
            rate in 0.5f32..15.0,
            positive in any::<bool>(),
        ) {
            let delta = if positive { magnitude } else { -magnitude };
            let (sim, mut sensors, mut drive) = rig(start, rate);

            let report = rotate(delta, &mut sensors, &mut drive, &RotCtrlParams::default())
                .unwrap()
                .unwrap();

            if positive {
                prop_assert!(report.final_deg >= report.target_deg);
            } else {
                prop_assert!(report.final_deg <= report.target_deg);
            }
            prop_assert!(report.num_polls >= 1);

            // Exactly one spin and one stop
            let mut expected = if positive {
                spin_positive_events()
            } else {
                spin_negative_events()
            };
            expected.extend(stop_events());
            prop_assert_eq!(sim.events(), expected);
            prop_assert!(sim.is_stopped());
        }
    }
}
