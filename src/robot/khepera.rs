//! Khepera III platform

use super::{Robot, RobotGeometry, RobotInfo};
use crate::common::Pose;
use crate::error::Result;
use crate::perception::{BeamLayout, OdometryEstimator, PoseEstimator, SensorFrame};

pub const WHEEL_BASE: f64 = 0.0885;
pub const WHEEL_RADIUS: f64 = 0.021;
pub const TICKS_PER_REVOLUTION: f64 = 2765.0;
/// Top wheel speed (m/s)
pub const MAX_WHEEL_SPEED: f64 = 0.3148;

pub const IR_MIN_RANGE: f64 = 0.02;
pub const IR_MAX_RANGE: f64 = 0.2;

/// IR mounting angles in degrees, counter-clockwise from the front
pub const IR_ANGLES_DEG: [f64; 9] = [128.0, 75.0, 42.0, 13.0, -13.0, -42.0, -75.0, -128.0, 180.0];

/// Raw intensity reported with an obstacle at the minimum range
const IR_SATURATION: f64 = 3960.0;
const IR_FALLOFF: f64 = 30.0;

/// Convert a raw IR intensity into a distance in meters.
///
/// Intensity falls off exponentially with distance; the result is clamped to
/// the sensor's usable range and a non-positive reading means nothing seen.
pub fn ir_to_distance(raw: f64) -> f64 {
    if raw.is_nan() || raw <= 0.0 {
        return IR_MAX_RANGE;
    }
    let distance = (IR_SATURATION.ln() - raw.ln()) / IR_FALLOFF + IR_MIN_RANGE;
    distance.clamp(IR_MIN_RANGE, IR_MAX_RANGE)
}

/// Khepera III with nine IR range sensors and wheel encoders
#[derive(Debug, Clone)]
pub struct Khepera3 {
    geometry: RobotGeometry,
    estimator: OdometryEstimator,
}

impl Khepera3 {
    pub fn new() -> Result<Self> {
        let beams = BeamLayout::from_degrees(&IR_ANGLES_DEG, IR_MIN_RANGE, IR_MAX_RANGE)?;
        let geometry = RobotGeometry {
            wheel_base: WHEEL_BASE,
            wheel_radius: WHEEL_RADIUS,
            ticks_per_revolution: TICKS_PER_REVOLUTION,
            beams,
        };
        let estimator = OdometryEstimator::new(&geometry);
        Ok(Khepera3 {
            geometry,
            estimator,
        })
    }
}

impl Robot for Khepera3 {
    fn geometry(&self) -> &RobotGeometry {
        &self.geometry
    }

    fn estimate_pose(&mut self, previous: Pose, info: &RobotInfo) -> Pose {
        self.estimator.estimate(previous, info)
    }

    fn sensor_frame(&self, info: &RobotInfo) -> Result<SensorFrame> {
        let distances: Vec<f64> = info.readings.iter().map(|&raw| ir_to_distance(raw)).collect();
        self.geometry.beams.frame(&distances)
    }

    fn reset(&mut self) {
        self.estimator.reset();
    }
}
