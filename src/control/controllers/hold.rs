//! Halt controller

use crate::common::VelocityCommand;
use crate::control::{Controller, CycleParams, Gains};
use crate::error::Result;

/// Commands the robot to stand still
#[derive(Debug, Clone, Default)]
pub struct Hold {
    gains: Gains,
}

impl Hold {
    pub fn new(gains: Gains) -> Self {
        Hold { gains }
    }
}

impl Controller for Hold {
    fn execute(&mut self, _params: &CycleParams, _dt: f64) -> VelocityCommand {
        VelocityCommand::stop()
    }

    fn set_parameters(&mut self, gains: Gains) -> Result<()> {
        gains.validate()?;
        self.gains = gains;
        Ok(())
    }

    fn get_parameters(&self) -> Gains {
        self.gains
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "Hold"
    }
}
