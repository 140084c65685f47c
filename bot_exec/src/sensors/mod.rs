//! # Sensor facade
//!
//! Uniform single-sample queries over the robot's gyroscope, ranging sensor and color sensor.
//! Every query arms the device mode first, since the devices need re-arming before each sample.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;

use crate::eqpt::{Color, ColorMode, ColorSensor, Gyro, GyroMode, RangeMode, RangeSensor};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Sensor facade.
pub struct Sensors {
    gyro: Box<dyn Gyro>,
    range: Box<dyn RangeSensor>,
    color: Box<dyn ColorSensor>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Sensors {
    pub fn new(
        gyro: Box<dyn Gyro>,
        range: Box<dyn RangeSensor>,
        color: Box<dyn ColorSensor>,
    ) -> Self {
        Self { gyro, range, color }
    }

    /// Read the accumulated heading in degrees.
    pub fn read_angle(&mut self) -> f32 {
        self.gyro.set_mode(GyroMode::Angle);
        self.gyro.read_angle_deg()
    }

    /// Read the distance to the nearest object in meters.
    ///
    /// The ranging sensor is enabled by this call and left enabled.
    pub fn read_distance_m(&mut self) -> f32 {
        self.range.set_mode(RangeMode::Distance);
        self.range.enable();
        let dist_m = self.range.read_distance_m();

        trace!("Distance: {:.3} m", dist_m);

        dist_m
    }

    /// Read the color under the color sensor.
    pub fn read_color(&mut self) -> Color {
        self.color.set_mode(ColorMode::ColorId);
        let id = self.color.read_color_id();
        let color = Color::from_raw_id(id);

        trace!("Color: raw {} -> {:?}", id, color);

        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimParams, SimRover};

    fn sensors(params: SimParams) -> (SimRover, Sensors) {
        let sim = SimRover::new(&params);
        let hw = sim.hardware();
        (sim, Sensors::new(hw.gyro, hw.range, hw.color))
    }

    #[test]
    fn test_angle_arms_every_read() {
        let (sim, mut sensors) = sensors(SimParams {
            initial_heading_deg: -725.5,
            ..Default::default()
        });

        for _ in 0..5 {
            // Heading is not wrapped into [0, 360)
            assert_eq!(sensors.read_angle(), -725.5);
        }

        assert_eq!(sim.num_angle_reads(), 5);
        assert_eq!(sim.num_unarmed_reads(), 0);
    }

    #[test]
    fn test_distance_leaves_sensor_enabled() {
        let (sim, mut sensors) = sensors(SimParams {
            distance_m: 0.42,
            ..Default::default()
        });

        assert!(!sim.is_range_enabled());
        assert_eq!(sensors.read_distance_m(), 0.42);
        assert!(sim.is_range_enabled());

        sim.set_distance_m(1.5);
        assert_eq!(sensors.read_distance_m(), 1.5);
    }

    #[test]
    fn test_color_remapping() {
        let (sim, mut sensors) = sensors(SimParams::default());

        for (id, color) in &[
            (0, Color::Red),
            (2, Color::Blue),
            (3, Color::Yellow),
            (6, Color::Yellow),
            (1, Color::Unknown),
        ] {
            sim.set_color_id(*id);
            assert_eq!(sensors.read_color(), *color);
        }
    }
}
