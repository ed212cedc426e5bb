//! Perception: range sensor frames and pose estimation
pub mod localization;
pub mod sensors;

pub use self::localization::{OdometryEstimator, PoseEstimator};
pub use self::sensors::{BeamLayout, SensorFrame, SensorReading};
