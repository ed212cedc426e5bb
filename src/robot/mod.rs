//! Robot specializations: platform geometry, telemetry and pose estimation
pub mod khepera;

pub use self::khepera::Khepera3;

use crate::common::Pose;
use crate::error::{ensure_positive, Result};
use crate::perception::{BeamLayout, OdometryEstimator, PoseEstimator, SensorFrame};

/// Physical layout of a differential-drive platform
#[derive(Debug, Clone, PartialEq)]
pub struct RobotGeometry {
    /// Distance between the wheels (m)
    pub wheel_base: f64,
    /// Wheel radius (m)
    pub wheel_radius: f64,
    /// Encoder ticks per wheel revolution
    pub ticks_per_revolution: f64,
    /// Range sensor mounting table
    pub beams: BeamLayout,
}

impl RobotGeometry {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("wheel_base", self.wheel_base)?;
        ensure_positive("wheel_radius", self.wheel_radius)?;
        ensure_positive("ticks_per_revolution", self.ticks_per_revolution)?;
        Ok(())
    }

    /// Distance travelled by a wheel per encoder tick (m)
    pub fn meters_per_tick(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.wheel_radius / self.ticks_per_revolution
    }
}

/// Cumulative wheel encoder counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WheelTicks {
    pub left: i64,
    pub right: i64,
}

/// Telemetry handed to the core once per cycle
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RobotInfo {
    pub ticks: WheelTicks,
    /// Raw range sensor values, one per beam in mounting order
    pub readings: Vec<f64>,
    /// External localization input; replaces dead reckoning when present
    pub position_fix: Option<Pose>,
}

impl RobotInfo {
    pub fn new(ticks: WheelTicks, readings: Vec<f64>) -> Self {
        RobotInfo {
            ticks,
            readings,
            position_fix: None,
        }
    }

    pub fn with_position_fix(mut self, pose: Pose) -> Self {
        self.position_fix = Some(pose);
        self
    }
}

/// Platform-specific hooks used by the supervisor every cycle
pub trait Robot {
    fn geometry(&self) -> &RobotGeometry;

    /// Fuse this cycle's telemetry into a pose; called exactly once per cycle
    fn estimate_pose(&mut self, previous: Pose, info: &RobotInfo) -> Pose;

    /// Turn raw sensor readings into distances aligned with the beam table
    fn sensor_frame(&self, info: &RobotInfo) -> Result<SensorFrame>;

    /// Drop telemetry history
    fn reset(&mut self) {}
}

/// A generic platform whose sensors already report distances in meters
#[derive(Debug, Clone)]
pub struct DiffDriveRobot<E = OdometryEstimator> {
    geometry: RobotGeometry,
    estimator: E,
}

impl DiffDriveRobot<OdometryEstimator> {
    /// Create a robot that localizes from its wheel encoders
    pub fn new(geometry: RobotGeometry) -> Result<Self> {
        geometry.validate()?;
        let estimator = OdometryEstimator::new(&geometry);
        Ok(DiffDriveRobot {
            geometry,
            estimator,
        })
    }
}

impl<E: PoseEstimator> DiffDriveRobot<E> {
    /// Create a robot with a custom pose estimator
    pub fn with_estimator(geometry: RobotGeometry, estimator: E) -> Result<Self> {
        geometry.validate()?;
        Ok(DiffDriveRobot {
            geometry,
            estimator,
        })
    }
}

impl<E: PoseEstimator> Robot for DiffDriveRobot<E> {
    fn geometry(&self) -> &RobotGeometry {
        &self.geometry
    }

    fn estimate_pose(&mut self, previous: Pose, info: &RobotInfo) -> Pose {
        self.estimator.estimate(previous, info)
    }

    fn sensor_frame(&self, info: &RobotInfo) -> Result<SensorFrame> {
        self.geometry.beams.frame(&info.readings)
    }

    fn reset(&mut self) {
        self.estimator.reset();
    }
}
