//! Unicycle to differential-drive conversion

use crate::common::{VelocityCommand, WheelSpeeds};
use crate::error::{ensure_positive, Result};
use log::debug;

/// Convert a unicycle command into left/right wheel speeds.
///
/// When either wheel would exceed `max_wheel_speed`, both are scaled by the same
/// factor so the commanded turn ratio is kept. `max_wheel_speed` must be
/// positive.
pub fn uni2diff(linear: f64, angular: f64, wheel_base: f64, max_wheel_speed: f64) -> WheelSpeeds {
    let left = linear - angular * wheel_base / 2.0;
    let right = linear + angular * wheel_base / 2.0;

    let fastest = left.abs().max(right.abs());
    if fastest > max_wheel_speed {
        let scale = max_wheel_speed / fastest;
        debug!(
            "wheel speeds ({:.4}, {:.4}) exceed {:.4}, scaling by {:.4}",
            left, right, max_wheel_speed, scale
        );
        WheelSpeeds::new(left * scale, right * scale)
    } else {
        WheelSpeeds::new(left, right)
    }
}

/// A differential drive base with a fixed wheel base and speed limit
#[derive(Debug, Clone, Copy)]
pub struct DifferentialDrive {
    wheel_base: f64,
    max_wheel_speed: f64,
}

impl DifferentialDrive {
    pub fn new(wheel_base: f64, max_wheel_speed: f64) -> Result<Self> {
        ensure_positive("wheel_base", wheel_base)?;
        ensure_positive("max_wheel_speed", max_wheel_speed)?;
        Ok(DifferentialDrive {
            wheel_base,
            max_wheel_speed,
        })
    }

    /// Compute bounded wheel speeds for a velocity command
    pub fn wheel_speeds(&self, command: &VelocityCommand) -> WheelSpeeds {
        uni2diff(
            command.linear,
            command.angular,
            self.wheel_base,
            self.max_wheel_speed,
        )
    }

    pub fn wheel_base(&self) -> f64 {
        self.wheel_base
    }

    pub fn max_wheel_speed(&self) -> f64 {
        self.max_wheel_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(-0.8)]
    fn test_straight_line(#[case] v: f64) {
        let speeds = uni2diff(v, 0.0, 0.1, 1.0);
        assert_relative_eq!(speeds.left, v);
        assert_relative_eq!(speeds.right, v);
    }

    #[rstest]
    #[case(1.0)]
    #[case(-3.0)]
    #[case(50.0)]
    fn test_pure_rotation(#[case] omega: f64) {
        let speeds = uni2diff(0.0, omega, 0.1, 1.0);
        assert_relative_eq!(speeds.left, -speeds.right);
    }

    #[test]
    fn test_equal_clamp() {
        let speeds = uni2diff(2.0, 0.0, 1.0, 1.0);
        assert_relative_eq!(speeds.left, 1.0);
        assert_relative_eq!(speeds.right, 1.0);
    }

    #[test]
    fn test_clamp_preserves_turn_ratio() {
        let raw = uni2diff(1.0, 2.0, 1.0, f64::MAX);
        let clamped = uni2diff(1.0, 2.0, 1.0, 1.0);

        assert_relative_eq!(raw.left, 0.0);
        assert_relative_eq!(raw.right, 2.0);
        assert_relative_eq!(clamped.right, 1.0);
        assert_relative_eq!(clamped.left, 0.0);

        let raw = uni2diff(0.5, 3.0, 0.5, f64::MAX);
        let clamped = uni2diff(0.5, 3.0, 0.5, 0.4);
        assert_relative_eq!(clamped.left / clamped.right, raw.left / raw.right, epsilon = 1e-12);
        assert_relative_eq!(clamped.left.abs().max(clamped.right.abs()), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_differential_drive_validates_geometry() {
        assert!(DifferentialDrive::new(0.0, 1.0).is_err());
        assert!(DifferentialDrive::new(0.1, -1.0).is_err());

        let drive = DifferentialDrive::new(0.1, 0.3).unwrap();
        let speeds = drive.wheel_speeds(&VelocityCommand::new(0.1, 1.0));
        assert_relative_eq!(speeds.left, 0.05);
        assert_relative_eq!(speeds.right, 0.15);
    }
}
