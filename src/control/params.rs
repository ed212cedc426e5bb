//! Gains and the per-cycle parameter context shared by all controllers

use crate::common::{Goal, Pose};
use crate::error::{ensure_non_negative, ControlError, Result};
use crate::perception::{BeamLayout, SensorFrame};
use crate::robot::RobotGeometry;
use serde::{Deserialize, Serialize};

/// PID gains for a heading controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Gains {
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Gains { kp, ki, kd }
    }

    /// All gains must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("kp", self.kp)?;
        ensure_non_negative("ki", self.ki)?;
        ensure_non_negative("kd", self.kd)?;
        Ok(())
    }
}

impl Default for Gains {
    fn default() -> Self {
        Gains {
            kp: 5.0,
            ki: 0.1,
            kd: 0.01,
        }
    }
}

/// Runtime parameters handed in by the parameter loader
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlParams {
    pub goal: Goal,
    /// Cruise linear velocity (m/s)
    pub velocity: f64,
    pub gains: Gains,
}

impl ControlParams {
    pub fn validate(&self) -> Result<()> {
        if !self.goal.is_finite() {
            return Err(ControlError::invalid(
                "goal",
                format!("coordinates must be finite, got {:?}", self.goal),
            ));
        }
        ensure_non_negative("velocity", self.velocity)?;
        self.gains.validate()
    }
}

/// Context for one control cycle.
///
/// Field ownership:
/// - `goal`, `velocity`, `gains`: written by the supervisor on a parameter
///   change, read by controllers.
/// - `pose`, `sensors`: written once per cycle by the supervisor before the
///   switching rule runs, read-only for the rest of the cycle.
/// - `wheel_base`, `beams`: fixed at construction from robot geometry.
#[derive(Debug, Clone)]
pub struct CycleParams {
    goal: Goal,
    velocity: f64,
    gains: Gains,
    pose: Pose,
    sensors: SensorFrame,
    wheel_base: f64,
    beams: BeamLayout,
}

impl CycleParams {
    /// Build the context with a clear sensor frame and the pose at the origin
    pub fn new(params: ControlParams, geometry: &RobotGeometry) -> Result<Self> {
        params.validate()?;
        Ok(CycleParams {
            goal: params.goal,
            velocity: params.velocity,
            gains: params.gains,
            pose: Pose::default(),
            sensors: geometry.beams.clear_frame(),
            wheel_base: geometry.wheel_base,
            beams: geometry.beams.clone(),
        })
    }

    /// Overwrite the parameter fields after validating them
    pub fn apply(&mut self, params: ControlParams) -> Result<()> {
        params.validate()?;
        self.goal = params.goal;
        self.velocity = params.velocity;
        self.gains = params.gains;
        Ok(())
    }

    /// Store this cycle's pose and sensor snapshot
    pub fn refresh(&mut self, pose: Pose, sensors: SensorFrame) -> Result<()> {
        if sensors.len() != self.beams.len() {
            return Err(ControlError::SensorIndexMismatch {
                expected: self.beams.len(),
                actual: sensors.len(),
            });
        }
        self.pose = pose;
        self.sensors = sensors;
        Ok(())
    }

    pub fn control_params(&self) -> ControlParams {
        ControlParams {
            goal: self.goal,
            velocity: self.velocity,
            gains: self.gains,
        }
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn gains(&self) -> Gains {
        self.gains
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn sensors(&self) -> &SensorFrame {
        &self.sensors
    }

    pub fn wheel_base(&self) -> f64 {
        self.wheel_base
    }

    pub fn beams(&self) -> &BeamLayout {
        &self.beams
    }

    pub fn distance_to_goal(&self) -> f64 {
        self.pose.distance_to(&self.goal)
    }

    /// Within half a wheel base of the goal
    pub fn at_goal(&self) -> bool {
        self.distance_to_goal() < self.wheel_base / 2.0
    }

    /// Distance reported by the nearest beam, `max_range` when nothing is seen
    pub fn nearest_obstacle(&self) -> f64 {
        self.sensors
            .nearest()
            .map(|r| r.distance)
            .unwrap_or(self.beams.max_range())
    }
}
