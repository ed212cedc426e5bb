//! Pose estimation from platform telemetry

use crate::common::{normalize_angle, Pose};
use crate::robot::{RobotGeometry, RobotInfo, WheelTicks};
use log::warn;

/// Fuses one cycle of telemetry into the pose used by every controller
pub trait PoseEstimator: Send {
    /// Produce the pose for this cycle from the previous one
    fn estimate(&mut self, previous: Pose, info: &RobotInfo) -> Pose;

    /// Forget any telemetry history
    fn reset(&mut self);
}

/// Wheel-encoder dead reckoning
#[derive(Debug, Clone)]
pub struct OdometryEstimator {
    meters_per_tick: f64,
    wheel_base: f64,
    last_ticks: Option<WheelTicks>,
}

impl OdometryEstimator {
    /// Create an estimator for the given platform geometry
    pub fn new(geometry: &RobotGeometry) -> Self {
        OdometryEstimator {
            meters_per_tick: geometry.meters_per_tick(),
            wheel_base: geometry.wheel_base,
            last_ticks: None,
        }
    }

    /// Pose change for a pair of tick deltas, integrated at the arc midpoint
    fn integrate(&self, previous: Pose, delta_left: i64, delta_right: i64) -> Pose {
        let left = delta_left as f64 * self.meters_per_tick;
        let right = delta_right as f64 * self.meters_per_tick;

        let distance = (left + right) / 2.0;
        let delta_theta = (right - left) / self.wheel_base;
        let heading = previous.theta + delta_theta / 2.0;

        Pose::new(
            previous.x + distance * heading.cos(),
            previous.y + distance * heading.sin(),
            normalize_angle(previous.theta + delta_theta),
        )
    }
}

impl PoseEstimator for OdometryEstimator {
    fn estimate(&mut self, previous: Pose, info: &RobotInfo) -> Pose {
        let last = self.last_ticks.replace(info.ticks);

        match info.position_fix {
            Some(fix) if fix.is_finite() => {
                return Pose::new(fix.x, fix.y, normalize_angle(fix.theta));
            }
            Some(fix) => warn!("ignoring non-finite position fix {:?}", fix),
            None => {}
        }

        match last {
            // First sample only sets the encoder baseline
            None => previous,
            Some(last) => self.integrate(
                previous,
                info.ticks.left.wrapping_sub(last.left),
                info.ticks.right.wrapping_sub(last.right),
            ),
        }
    }

    fn reset(&mut self) {
        self.last_ticks = None;
    }
}
