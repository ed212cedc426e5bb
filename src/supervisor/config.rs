//! Supervisor configuration supplied by the parameter loader

use crate::common::Goal;
use crate::control::{ControlParams, ControllerId, Gains};
use crate::error::{ensure_non_negative, ensure_positive, ControlError, Result};
use crate::robot::RobotGeometry;
use serde::{Deserialize, Serialize};

/// Everything a supervisor needs besides the robot itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    pub goal: Goal,
    pub gains: Gains,
    /// Cruise linear velocity (m/s)
    pub velocity: f64,
    /// Wheel speed limit applied by the kinematic converter (m/s)
    pub max_wheel_speed: f64,
    /// Distance at which blending hands full control to obstacle avoidance (m)
    pub safety_distance: f64,
    /// Controllers to register, in order; the first is the initial state
    pub controllers: Vec<ControllerId>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        SupervisorConfig {
            goal: Goal::new(1.0, 1.0),
            gains: Gains::default(),
            velocity: 0.1,
            max_wheel_speed: 0.3,
            safety_distance: 0.05,
            controllers: vec![ControllerId::Blended, ControllerId::Hold],
        }
    }
}

impl SupervisorConfig {
    /// Check the config against the robot it will drive
    pub fn validate(&self, geometry: &RobotGeometry) -> Result<()> {
        self.control_params().validate()?;
        ensure_positive("max_wheel_speed", self.max_wheel_speed)?;
        ensure_non_negative("safety_distance", self.safety_distance)?;
        if self.safety_distance >= geometry.beams.max_range() {
            return Err(ControlError::invalid(
                "safety_distance",
                format!(
                    "must be below the sensor max range ({} >= {})",
                    self.safety_distance,
                    geometry.beams.max_range()
                ),
            ));
        }
        if self.controllers.is_empty() {
            return Err(ControlError::invalid("controllers", "at least one controller is required"));
        }
        Ok(())
    }

    pub fn control_params(&self) -> ControlParams {
        ControlParams {
            goal: self.goal,
            velocity: self.velocity,
            gains: self.gains,
        }
    }
}
