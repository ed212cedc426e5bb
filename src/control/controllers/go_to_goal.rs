//! Goal-seeking heading controller

use crate::common::{normalize_angle, VelocityCommand};
use crate::control::pid::HeadingPid;
use crate::control::{Controller, CycleParams, Gains};
use crate::error::Result;
use log::debug;

/// Steers toward the goal point at the configured cruise velocity
#[derive(Debug, Clone, Default)]
pub struct GoToGoal {
    pid: HeadingPid,
}

impl GoToGoal {
    pub fn new(gains: Gains) -> Self {
        GoToGoal {
            pid: HeadingPid::new(gains),
        }
    }

    /// Bearing from the robot to the goal relative to its heading, in `(-PI, PI]`
    pub fn heading_error(params: &CycleParams) -> f64 {
        let pose = params.pose();
        normalize_angle(pose.bearing_to(&params.goal()) - pose.theta)
    }

    pub fn integral_error(&self) -> f64 {
        self.pid.integral_error()
    }

    pub fn previous_error(&self) -> f64 {
        self.pid.previous_error()
    }
}

impl Controller for GoToGoal {
    fn execute(&mut self, params: &CycleParams, dt: f64) -> VelocityCommand {
        let error = Self::heading_error(params);
        let angular = self.pid.update(error, dt);
        debug!("go-to-goal: heading error {:.4} rad, omega {:.4}", error, angular);

        VelocityCommand::new(params.velocity(), angular)
    }

    fn set_parameters(&mut self, gains: Gains) -> Result<()> {
        gains.validate()?;
        self.pid.set_gains(gains);
        Ok(())
    }

    fn get_parameters(&self) -> Gains {
        self.pid.gains()
    }

    fn reset(&mut self) {
        self.pid.reset();
    }

    fn name(&self) -> &str {
        "GoToGoal"
    }
}
