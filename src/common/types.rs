//! Plain value types exchanged with the core every control cycle

use serde::{Deserialize, Serialize};

/// A 2D pose (x, y, theta) in the world frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading in radians, counter-clockwise from the world x-axis
    pub theta: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }

    /// Euclidean distance from this pose to a goal point
    pub fn distance_to(&self, goal: &Goal) -> f64 {
        (goal.x - self.x).hypot(goal.y - self.y)
    }

    /// World-frame bearing from this pose to a goal point
    pub fn bearing_to(&self, goal: &Goal) -> f64 {
        (goal.y - self.y).atan2(goal.x - self.x)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.theta.is_finite()
    }
}

/// A goal point in the world frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Goal {
    pub x: f64,
    pub y: f64,
}

impl Goal {
    pub const fn new(x: f64, y: f64) -> Self {
        Goal { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Unicycle velocity command produced by a controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityCommand {
    /// Linear velocity (m/s)
    pub linear: f64,
    /// Angular velocity (rad/s)
    pub angular: f64,
}

impl VelocityCommand {
    pub const fn new(linear: f64, angular: f64) -> Self {
        VelocityCommand { linear, angular }
    }

    pub const fn stop() -> Self {
        VelocityCommand {
            linear: 0.0,
            angular: 0.0,
        }
    }

    /// Mix two commands as `(1 - weight) * self + weight * other`
    pub fn blend(&self, other: &VelocityCommand, weight: f64) -> VelocityCommand {
        VelocityCommand {
            linear: (1.0 - weight) * self.linear + weight * other.linear,
            angular: (1.0 - weight) * self.angular + weight * other.angular,
        }
    }
}

/// Linear speeds of the left and right wheels (m/s)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelSpeeds {
    pub left: f64,
    pub right: f64,
}

impl WheelSpeeds {
    pub const fn new(left: f64, right: f64) -> Self {
        WheelSpeeds { left, right }
    }

    /// Convert to wheel angular rates (rad/s) for drivers that take rotation speed
    pub fn to_angular(&self, wheel_radius: f64) -> (f64, f64) {
        (self.left / wheel_radius, self.right / wheel_radius)
    }
}
