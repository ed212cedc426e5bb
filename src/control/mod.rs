//! Feedback controllers and the kinematic converter
pub mod controllers;
pub mod kinematics;
pub mod params;
pub mod pid;
pub mod registry;

pub use self::controllers::{AvoidObstacles, BlendGtgAvoid, GoToGoal, Hold};
pub use self::kinematics::{uni2diff, DifferentialDrive};
pub use self::params::{ControlParams, CycleParams, Gains};
pub use self::registry::ControllerRegistry;

use crate::common::VelocityCommand;
use crate::error::Result;
use crate::perception::BeamLayout;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// A feedback law turning the cycle context into a velocity command
pub trait Controller: Debug + Send {
    /// Compute the command for this cycle and advance internal error state
    fn execute(&mut self, params: &CycleParams, dt: f64) -> VelocityCommand;

    /// Replace the gains; clears accumulated error state
    fn set_parameters(&mut self, gains: Gains) -> Result<()>;

    /// Current gains; feeding them back to `set_parameters` changes nothing
    fn get_parameters(&self) -> Gains;

    /// Clear accumulated error state, keeping the gains
    fn reset(&mut self);

    /// Get the name of this controller
    fn name(&self) -> &str;
}

/// Stable identifiers for the controllers a supervisor can register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerId {
    GoToGoal,
    AvoidObstacles,
    Blended,
    Hold,
}

impl ControllerId {
    pub const ALL: [ControllerId; 4] = [
        ControllerId::GoToGoal,
        ControllerId::AvoidObstacles,
        ControllerId::Blended,
        ControllerId::Hold,
    ];

    /// Construct the controller this identifier stands for
    pub fn build(
        self,
        gains: Gains,
        safety_distance: f64,
        beams: &BeamLayout,
    ) -> Result<ControllerKind> {
        gains.validate()?;
        Ok(match self {
            ControllerId::GoToGoal => ControllerKind::GoToGoal(GoToGoal::new(gains)),
            ControllerId::AvoidObstacles => {
                ControllerKind::AvoidObstacles(AvoidObstacles::new(gains))
            }
            ControllerId::Blended => {
                ControllerKind::Blended(BlendGtgAvoid::new(gains, safety_distance, beams)?)
            }
            ControllerId::Hold => ControllerKind::Hold(Hold::new(gains)),
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerId::GoToGoal => "go_to_goal",
            ControllerId::AvoidObstacles => "avoid_obstacles",
            ControllerId::Blended => "blended",
            ControllerId::Hold => "hold",
        }
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The controller library as tagged variants
#[derive(Debug, Clone)]
pub enum ControllerKind {
    GoToGoal(GoToGoal),
    AvoidObstacles(AvoidObstacles),
    Blended(BlendGtgAvoid),
    Hold(Hold),
}

impl ControllerKind {
    pub fn id(&self) -> ControllerId {
        match self {
            ControllerKind::GoToGoal(_) => ControllerId::GoToGoal,
            ControllerKind::AvoidObstacles(_) => ControllerId::AvoidObstacles,
            ControllerKind::Blended(_) => ControllerId::Blended,
            ControllerKind::Hold(_) => ControllerId::Hold,
        }
    }

    /// Blend weight of the last execution, for blending controllers only
    pub fn blend_weight(&self) -> Option<f64> {
        match self {
            ControllerKind::Blended(blend) => Some(blend.last_weight()),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn Controller {
        match self {
            ControllerKind::GoToGoal(c) => c,
            ControllerKind::AvoidObstacles(c) => c,
            ControllerKind::Blended(c) => c,
            ControllerKind::Hold(c) => c,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Controller {
        match self {
            ControllerKind::GoToGoal(c) => c,
            ControllerKind::AvoidObstacles(c) => c,
            ControllerKind::Blended(c) => c,
            ControllerKind::Hold(c) => c,
        }
    }
}

impl Controller for ControllerKind {
    fn execute(&mut self, params: &CycleParams, dt: f64) -> VelocityCommand {
        self.inner_mut().execute(params, dt)
    }

    fn set_parameters(&mut self, gains: Gains) -> Result<()> {
        self.inner_mut().set_parameters(gains)
    }

    fn get_parameters(&self) -> Gains {
        self.inner().get_parameters()
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }
}
