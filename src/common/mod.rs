//! Common types and utilities shared by the controllers, the supervisor and the
//! robot specializations.

pub mod types;

pub use self::types::{Goal, Pose, VelocityCommand, WheelSpeeds};

use std::f64::consts::PI;

/// Normalize an angle into `(-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}
