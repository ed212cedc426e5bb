//! Behavior supervision and feedback control for differential-drive robots.
//!
//! Each control cycle the [`Supervisor`] estimates the robot pose from platform
//! telemetry, picks (or blends) a controller from its registry, runs it, and
//! converts the resulting unicycle command into bounded wheel speeds.

pub mod common;
pub mod control;
pub mod error;
pub mod perception;
pub mod robot;
pub mod supervisor;

pub use crate::common::{Goal, Pose, VelocityCommand, WheelSpeeds};
pub use crate::control::{
    uni2diff, ControlParams, Controller, ControllerId, ControllerKind, CycleParams, Gains,
};
pub use crate::error::{ControlError, Result};
pub use crate::perception::{BeamLayout, SensorFrame, SensorReading};
pub use crate::robot::{DiffDriveRobot, Khepera3, Robot, RobotGeometry, RobotInfo, WheelTicks};
pub use crate::supervisor::{
    BlendUntilGoal, GoalOrObstacle, Supervisor, SupervisorConfig, SwitchingPolicy,
};
