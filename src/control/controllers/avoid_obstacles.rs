//! Reactive obstacle avoidance

use crate::common::{normalize_angle, VelocityCommand};
use crate::control::pid::HeadingPid;
use crate::control::{Controller, CycleParams, Gains};
use crate::error::Result;
use crate::perception::SensorFrame;
use log::debug;
use nalgebra::Vector2;

/// Minimum distance used when weighting a beam, avoids dividing by zero
const MIN_WEIGHT_DISTANCE: f64 = 1e-3;

/// Beams mounted at exactly +-90 degrees do not count as facing forward
const FORWARD_COS_MIN: f64 = 1e-9;

/// Steers along the net repulsion of every beam that sees an obstacle
#[derive(Debug, Clone, Default)]
pub struct AvoidObstacles {
    pid: HeadingPid,
}

/// Repulsive weight of one beam: `max_range / distance` inside range, zero at or
/// beyond it.
pub fn repulsion_weight(distance: f64, max_range: f64) -> f64 {
    if distance >= max_range {
        0.0
    } else {
        max_range / distance.max(MIN_WEIGHT_DISTANCE)
    }
}

/// Net avoidance vector in the robot frame.
///
/// Starts from a unit vector straight ahead and subtracts each beam's repulsion
/// along its mounting direction.
pub fn avoidance_vector(frame: &SensorFrame, max_range: f64) -> Vector2<f64> {
    frame
        .readings()
        .iter()
        .fold(Vector2::new(1.0, 0.0), |net, reading| {
            let weight = repulsion_weight(reading.distance, max_range);
            net - weight * Vector2::new(reading.angle.cos(), reading.angle.sin())
        })
}

impl AvoidObstacles {
    pub fn new(gains: Gains) -> Self {
        AvoidObstacles {
            pid: HeadingPid::new(gains),
        }
    }

    /// Robot-frame heading of the avoidance vector, in `(-PI, PI]`
    pub fn heading_error(params: &CycleParams) -> f64 {
        let net = avoidance_vector(params.sensors(), params.beams().max_range());
        if net.norm() < f64::EPSILON {
            0.0
        } else {
            normalize_angle(net.y.atan2(net.x))
        }
    }

    /// Fraction of cruise speed allowed for the nearest obstacle ahead.
    ///
    /// Only beams facing forward count; an obstacle behind or beside the robot
    /// is not in the way of forward motion.
    pub fn speed_factor(params: &CycleParams) -> f64 {
        let beams = params.beams();
        let nearest_ahead = params
            .sensors()
            .readings()
            .iter()
            .filter(|reading| reading.angle.cos() > FORWARD_COS_MIN)
            .map(|reading| reading.distance)
            .fold(beams.max_range(), f64::min);
        let span = beams.max_range() - beams.min_range();
        ((nearest_ahead - beams.min_range()) / span).clamp(0.0, 1.0)
    }

    pub fn integral_error(&self) -> f64 {
        self.pid.integral_error()
    }
}

impl Controller for AvoidObstacles {
    fn execute(&mut self, params: &CycleParams, dt: f64) -> VelocityCommand {
        let error = Self::heading_error(params);
        let angular = self.pid.update(error, dt);
        let linear = params.velocity() * Self::speed_factor(params);
        debug!(
            "avoid-obstacles: heading error {:.4} rad, v {:.4}, omega {:.4}",
            error, linear, angular
        );

        VelocityCommand::new(linear, angular)
    }

    fn set_parameters(&mut self, gains: Gains) -> Result<()> {
        gains.validate()?;
        self.pid.set_gains(gains);
        Ok(())
    }

    fn get_parameters(&self) -> Gains {
        self.pid.gains()
    }

    fn reset(&mut self) {
        self.pid.reset();
    }

    fn name(&self) -> &str {
        "AvoidObstacles"
    }
}
