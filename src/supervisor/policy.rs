//! Switching rules deciding which controller runs each cycle

use crate::control::{ControllerId, CycleParams};
use crate::error::{ensure_positive, Result};
use std::fmt::Debug;

/// Selects the active controller from the refreshed cycle context.
///
/// Implementations must be pure in `(params, current)` so the same inputs always
/// yield the same state.
pub trait SwitchingPolicy: Debug + Send {
    fn get_controller_state(&self, params: &CycleParams, current: ControllerId) -> ControllerId;
}

/// Blend goal seeking with avoidance until the goal is reached, then hold
/// forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlendUntilGoal;

impl SwitchingPolicy for BlendUntilGoal {
    fn get_controller_state(&self, params: &CycleParams, current: ControllerId) -> ControllerId {
        if current == ControllerId::Hold || params.at_goal() {
            ControllerId::Hold
        } else {
            ControllerId::Blended
        }
    }
}

/// Hard switching between goal seeking and avoidance on the nearest obstacle
/// distance, with the same terminal hold at the goal.
#[derive(Debug, Clone, Copy)]
pub struct GoalOrObstacle {
    unsafe_distance: f64,
}

impl GoalOrObstacle {
    pub fn new(unsafe_distance: f64) -> Result<Self> {
        ensure_positive("unsafe_distance", unsafe_distance)?;
        Ok(GoalOrObstacle { unsafe_distance })
    }

    pub fn unsafe_distance(&self) -> f64 {
        self.unsafe_distance
    }
}

impl SwitchingPolicy for GoalOrObstacle {
    fn get_controller_state(&self, params: &CycleParams, current: ControllerId) -> ControllerId {
        if current == ControllerId::Hold || params.at_goal() {
            ControllerId::Hold
        } else if params.nearest_obstacle() < self.unsafe_distance {
            ControllerId::AvoidObstacles
        } else {
            ControllerId::GoToGoal
        }
    }
}
