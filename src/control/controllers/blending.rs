//! Sensor-weighted blend of goal seeking and obstacle avoidance

use super::{AvoidObstacles, GoToGoal};
use crate::common::VelocityCommand;
use crate::control::{Controller, CycleParams, Gains};
use crate::error::{ensure_non_negative, ControlError, Result};
use crate::perception::{BeamLayout, SensorFrame};
use log::debug;

/// Weight of one beam: 1 at or inside `safety_distance`, 0 at or beyond
/// `max_range`, linear in between.
pub fn beam_weight(distance: f64, safety_distance: f64, max_range: f64) -> f64 {
    if distance >= max_range {
        0.0
    } else if distance <= safety_distance {
        1.0
    } else {
        (max_range - distance) / (max_range - safety_distance)
    }
}

/// Blend weight for a frame; the nearest obstacle dominates
pub fn blend_weight(frame: &SensorFrame, safety_distance: f64, max_range: f64) -> f64 {
    frame
        .distances()
        .map(|d| beam_weight(d, safety_distance, max_range))
        .fold(0.0, f64::max)
}

/// Runs [`GoToGoal`] and [`AvoidObstacles`] every cycle and mixes their outputs
#[derive(Debug, Clone)]
pub struct BlendGtgAvoid {
    go_to_goal: GoToGoal,
    avoid_obstacles: AvoidObstacles,
    safety_distance: f64,
    last_weight: f64,
}

impl BlendGtgAvoid {
    /// Create a blend for the given sensor layout.
    ///
    /// `safety_distance` must lie below the layout's max range. A threshold
    /// under the min range is raised to it, since no reading can be closer.
    pub fn new(gains: Gains, safety_distance: f64, beams: &BeamLayout) -> Result<Self> {
        ensure_non_negative("safety_distance", safety_distance)?;
        if safety_distance >= beams.max_range() {
            return Err(ControlError::invalid(
                "safety_distance",
                format!(
                    "must be below the sensor max range ({} >= {})",
                    safety_distance,
                    beams.max_range()
                ),
            ));
        }
        Ok(BlendGtgAvoid {
            go_to_goal: GoToGoal::new(gains),
            avoid_obstacles: AvoidObstacles::new(gains),
            safety_distance: safety_distance.max(beams.min_range()),
            last_weight: 0.0,
        })
    }

    /// Distance at which avoidance takes full control, never below min range
    pub fn safety_distance(&self) -> f64 {
        self.safety_distance
    }

    /// Weight used by the most recent `execute`
    pub fn last_weight(&self) -> f64 {
        self.last_weight
    }

    pub fn go_to_goal(&self) -> &GoToGoal {
        &self.go_to_goal
    }

    pub fn avoid_obstacles(&self) -> &AvoidObstacles {
        &self.avoid_obstacles
    }
}

impl Controller for BlendGtgAvoid {
    fn execute(&mut self, params: &CycleParams, dt: f64) -> VelocityCommand {
        let goal = self.go_to_goal.execute(params, dt);
        let avoid = self.avoid_obstacles.execute(params, dt);

        let weight = blend_weight(params.sensors(), self.safety_distance, params.beams().max_range());
        self.last_weight = weight;
        debug!("blending: weight {:.3}", weight);

        goal.blend(&avoid, weight)
    }

    fn set_parameters(&mut self, gains: Gains) -> Result<()> {
        gains.validate()?;
        self.go_to_goal.set_parameters(gains)?;
        self.avoid_obstacles.set_parameters(gains)
    }

    fn get_parameters(&self) -> Gains {
        self.go_to_goal.get_parameters()
    }

    fn reset(&mut self) {
        self.go_to_goal.reset();
        self.avoid_obstacles.reset();
        self.last_weight = 0.0;
    }

    fn name(&self) -> &str {
        "BlendGTGAvoid"
    }
}
