//! # Simulated robot
//!
//! A minimal differential-drive robot implementing every [`crate::eqpt`] trait. All device
//! handles share one [`SimBody`], so commanding the motors changes what the gyroscope reports:
//! while the motors spin in opposite directions each angle read advances the heading by
//! `turn_rate_deg_per_read`.
//!
//! The body also records every motor command so that tests can check the exact sequence issued.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{cell::RefCell, rc::Rc};

use log::warn;
use serde::Serialize;

use crate::eqpt::{
    ColorMode, ColorSensor, Gyro, GyroMode, Hardware, Motor, RangeMode, RangeSensor,
};

pub use params::SimParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Handle on a simulated robot, used to create the device handles and to inspect the body.
#[derive(Clone)]
pub struct SimRover {
    body: Rc<RefCell<SimBody>>,
}

/// Physical state of the simulated robot.
#[derive(Debug)]
struct SimBody {
    heading_deg: f32,
    turn_rate_deg_per_read: f32,
    gyro_stalled: bool,

    motors: [MotorState; 2],
    events: Vec<MotorEvent>,

    gyro_armed: bool,
    num_angle_reads: u64,
    num_unarmed_reads: u64,

    range_mode: Option<RangeMode>,
    range_enabled: bool,
    distance_m: f32,

    color_mode: Option<ColorMode>,
    color_id: i32,
}

/// State of one simulated motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MotorState {
    pub direction: MotorDirection,
    pub power_pct: Option<u8>,
}

/// A command received by one of the simulated motors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MotorEvent {
    pub side: Side,
    pub cmd: MotorCmd,
}

struct SimMotor {
    side: Side,
    body: Rc<RefCell<SimBody>>,
}

struct SimGyro {
    body: Rc<RefCell<SimBody>>,
}

struct SimRange {
    body: Rc<RefCell<SimBody>>,
}

struct SimColor {
    body: Rc<RefCell<SimBody>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MotorDirection {
    Stopped,
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MotorCmd {
    Forward,
    Backward,
    Stop,
    SetPower(u8),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimRover {
    pub fn new(params: &SimParams) -> Self {
        let stopped = MotorState {
            direction: MotorDirection::Stopped,
            power_pct: None,
        };

        Self {
            body: Rc::new(RefCell::new(SimBody {
                heading_deg: params.initial_heading_deg,
                turn_rate_deg_per_read: params.turn_rate_deg_per_read,
                gyro_stalled: false,
                motors: [stopped; 2],
                events: Vec::new(),
                gyro_armed: false,
                num_angle_reads: 0,
                num_unarmed_reads: 0,
                range_mode: None,
                range_enabled: false,
                distance_m: params.distance_m,
                color_mode: None,
                color_id: params.color_id,
            })),
        }
    }

    /// Create a set of device handles attached to this robot.
    pub fn hardware(&self) -> Hardware {
        Hardware {
            left_motor: Box::new(SimMotor {
                side: Side::Left,
                body: self.body.clone(),
            }),
            right_motor: Box::new(SimMotor {
                side: Side::Right,
                body: self.body.clone(),
            }),
            gyro: Box::new(SimGyro {
                body: self.body.clone(),
            }),
            range: Box::new(SimRange {
                body: self.body.clone(),
            }),
            color: Box::new(SimColor {
                body: self.body.clone(),
            }),
        }
    }

    /// The true heading of the robot in degrees.
    pub fn heading_deg(&self) -> f32 {
        self.body.borrow().heading_deg
    }

    pub fn motor(&self, side: Side) -> MotorState {
        self.body.borrow().motors[side.idx()]
    }

    /// True if both motors are stopped.
    pub fn is_stopped(&self) -> bool {
        self.body
            .borrow()
            .motors
            .iter()
            .all(|m| m.direction == MotorDirection::Stopped)
    }

    /// All motor commands received since creation or the last [`SimRover::clear_events`].
    pub fn events(&self) -> Vec<MotorEvent> {
        self.body.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.body.borrow_mut().events.clear()
    }

    /// Number of angle samples taken from the gyroscope.
    pub fn num_angle_reads(&self) -> u64 {
        self.body.borrow().num_angle_reads
    }

    /// Number of angle samples taken without arming the gyroscope first.
    pub fn num_unarmed_reads(&self) -> u64 {
        self.body.borrow().num_unarmed_reads
    }

    pub fn is_range_enabled(&self) -> bool {
        self.body.borrow().range_enabled
    }

    pub fn set_distance_m(&self, distance_m: f32) {
        self.body.borrow_mut().distance_m = distance_m
    }

    pub fn set_color_id(&self, color_id: i32) {
        self.body.borrow_mut().color_id = color_id
    }

    /// Freeze the gyroscope output, as if it had been disconnected.
    pub fn set_gyro_stalled(&self, stalled: bool) {
        self.body.borrow_mut().gyro_stalled = stalled
    }
}

impl SimBody {
    /// Rotation direction produced by the current motor states, +1 for counterclockwise.
    fn spin_sign(&self) -> f32 {
        let moving = |m: &MotorState| m.power_pct != Some(0);
        if !self.motors.iter().all(moving) {
            return 0.0;
        }

        match (self.motors[0].direction, self.motors[1].direction) {
            (MotorDirection::Backward, MotorDirection::Forward) => 1.0,
            (MotorDirection::Forward, MotorDirection::Backward) => -1.0,
            _ => 0.0,
        }
    }

    fn motor_cmd(&mut self, side: Side, cmd: MotorCmd) {
        let motor = &mut self.motors[side.idx()];
        match cmd {
            MotorCmd::Forward => motor.direction = MotorDirection::Forward,
            MotorCmd::Backward => motor.direction = MotorDirection::Backward,
            MotorCmd::Stop => motor.direction = MotorDirection::Stopped,
            MotorCmd::SetPower(p) => motor.power_pct = Some(p),
        }
        self.events.push(MotorEvent { side, cmd });
    }
}

impl Side {
    fn idx(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

impl Motor for SimMotor {
    fn forward(&mut self) {
        self.body.borrow_mut().motor_cmd(self.side, MotorCmd::Forward)
    }

    fn backward(&mut self) {
        self.body.borrow_mut().motor_cmd(self.side, MotorCmd::Backward)
    }

    fn stop(&mut self) {
        self.body.borrow_mut().motor_cmd(self.side, MotorCmd::Stop)
    }

    fn set_power(&mut self, percent: u8) {
        self.body
            .borrow_mut()
            .motor_cmd(self.side, MotorCmd::SetPower(percent))
    }
}

impl Gyro for SimGyro {
    fn set_mode(&mut self, mode: GyroMode) {
        match mode {
            GyroMode::Angle => self.body.borrow_mut().gyro_armed = true,
        }
    }

    fn read_angle_deg(&mut self) -> f32 {
        let mut body = self.body.borrow_mut();

        if !body.gyro_armed {
            warn!(
                "Simulated gyro read without arming {}",
                GyroMode::Angle.name()
            );
            body.num_unarmed_reads += 1;
        }
        body.gyro_armed = false;
        body.num_angle_reads += 1;

        if !body.gyro_stalled {
            let delta_deg = body.spin_sign() * body.turn_rate_deg_per_read;
            body.heading_deg += delta_deg;
        }

        body.heading_deg
    }
}

impl RangeSensor for SimRange {
    fn set_mode(&mut self, mode: RangeMode) {
        self.body.borrow_mut().range_mode = Some(mode)
    }

    fn enable(&mut self) {
        self.body.borrow_mut().range_enabled = true
    }

    fn read_distance_m(&mut self) -> f32 {
        let body = self.body.borrow();
        match (body.range_mode, body.range_enabled) {
            (Some(RangeMode::Distance), true) => body.distance_m,
            _ => {
                warn!(
                    "Simulated range sensor read while not enabled in {}",
                    RangeMode::Distance.name()
                );
                0.0
            }
        }
    }
}

impl ColorSensor for SimColor {
    fn set_mode(&mut self, mode: ColorMode) {
        self.body.borrow_mut().color_mode = Some(mode)
    }

    fn read_color_id(&mut self) -> i32 {
        let body = self.body.borrow();
        match body.color_mode {
            Some(ColorMode::ColorId) => body.color_id,
            None => {
                warn!(
                    "Simulated color sensor read without setting {}",
                    ColorMode::ColorId.name()
                );
                -1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_follows_spin() {
        let sim = SimRover::new(&SimParams {
            initial_heading_deg: 10.0,
            turn_rate_deg_per_read: 2.0,
            ..Default::default()
        });
        let mut hw = sim.hardware();

        // Stationary robot does not turn
        hw.gyro.set_mode(GyroMode::Angle);
        assert_eq!(hw.gyro.read_angle_deg(), 10.0);

        // Counterclockwise
        hw.left_motor.backward();
        hw.right_motor.forward();
        hw.gyro.set_mode(GyroMode::Angle);
        assert_eq!(hw.gyro.read_angle_deg(), 12.0);

        // Clockwise
        hw.left_motor.forward();
        hw.right_motor.backward();
        hw.gyro.set_mode(GyroMode::Angle);
        assert_eq!(hw.gyro.read_angle_deg(), 10.0);

        // Straight line does not turn
        hw.right_motor.forward();
        hw.gyro.set_mode(GyroMode::Angle);
        assert_eq!(hw.gyro.read_angle_deg(), 10.0);

        assert_eq!(sim.num_angle_reads(), 4);
        assert_eq!(sim.num_unarmed_reads(), 0);
    }

    #[test]
    fn test_zero_power_and_stall() {
        let sim = SimRover::new(&SimParams::default());
        let mut hw = sim.hardware();

        hw.left_motor.backward();
        hw.right_motor.forward();
        hw.left_motor.set_power(0);
        hw.gyro.set_mode(GyroMode::Angle);
        assert_eq!(hw.gyro.read_angle_deg(), 0.0);

        hw.left_motor.set_power(50);
        sim.set_gyro_stalled(true);
        hw.gyro.set_mode(GyroMode::Angle);
        assert_eq!(hw.gyro.read_angle_deg(), 0.0);

        // Unarmed reads are counted
        hw.gyro.read_angle_deg();
        assert_eq!(sim.num_unarmed_reads(), 1);
    }

    #[test]
    fn test_motor_events() {
        let sim = SimRover::new(&SimParams::default());
        let mut hw = sim.hardware();

        hw.left_motor.set_power(40);
        hw.right_motor.forward();
        hw.right_motor.stop();

        assert_eq!(
            sim.events(),
            vec![
                MotorEvent { side: Side::Left, cmd: MotorCmd::SetPower(40) },
                MotorEvent { side: Side::Right, cmd: MotorCmd::Forward },
                MotorEvent { side: Side::Right, cmd: MotorCmd::Stop },
            ]
        );
        assert_eq!(sim.motor(Side::Left).power_pct, Some(40));
        assert!(sim.is_stopped());

        sim.clear_events();
        assert!(sim.events().is_empty());
    }
}
