//! Supervisor: per-cycle arbitration among the registered controllers
pub mod config;
pub mod policy;

pub use self::config::SupervisorConfig;
pub use self::policy::{BlendUntilGoal, GoalOrObstacle, SwitchingPolicy};

use crate::common::{VelocityCommand, WheelSpeeds};
use crate::control::{
    Controller, ControlParams, ControllerId, ControllerRegistry, CycleParams, DifferentialDrive,
};
use crate::error::{ControlError, Result};
use crate::robot::{Robot, RobotInfo};
use log::{debug, error, info};

/// Owns the controllers and the cycle context for one robot run
#[derive(Debug)]
pub struct Supervisor<R: Robot> {
    robot: R,
    policy: Box<dyn SwitchingPolicy>,
    registry: ControllerRegistry,
    drive: DifferentialDrive,
    params: CycleParams,
    active: ControllerId,
    last_command: VelocityCommand,
    halted: bool,
}

impl<R: Robot> Supervisor<R> {
    /// Create a supervisor, registering the configured controllers in order
    pub fn new<P>(robot: R, config: SupervisorConfig, policy: P) -> Result<Self>
    where
        P: SwitchingPolicy + 'static,
    {
        let geometry = robot.geometry();
        geometry.validate()?;
        config.validate(geometry)?;

        let mut registry = ControllerRegistry::new();
        for id in &config.controllers {
            registry.register(id.build(config.gains, config.safety_distance, &geometry.beams)?)?;
        }
        let active = registry
            .initial()
            .ok_or_else(|| ControlError::invalid("controllers", "at least one controller is required"))?;

        let drive = DifferentialDrive::new(geometry.wheel_base, config.max_wheel_speed)?;
        let params = CycleParams::new(config.control_params(), geometry)?;

        info!(
            "supervisor ready with controllers [{}], starting in {}",
            registry
                .ids()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            active
        );

        Ok(Supervisor {
            robot,
            policy: Box::new(policy),
            registry,
            drive,
            params,
            active,
            last_command: VelocityCommand::stop(),
            halted: false,
        })
    }

    /// Refresh the cycle context and re-evaluate the switching rule.
    ///
    /// Runs the pose estimator exactly once. Returns the controller that will
    /// run this cycle. [`Supervisor::execute`] calls this first, so hosts only
    /// ever call `execute`.
    pub(crate) fn process(&mut self, info: &RobotInfo) -> Result<ControllerId> {
        if self.halted {
            return Err(ControlError::Halted);
        }
        self.guard(|sup| sup.refresh_and_switch(info))
    }

    /// Run one full control cycle and return the wheel speeds to apply
    pub fn execute(&mut self, info: &RobotInfo, dt: f64) -> Result<WheelSpeeds> {
        let active = self.process(info)?;

        let params = &self.params;
        let controller = match self.registry.get_mut(active) {
            Ok(controller) => controller,
            Err(e) => {
                self.halted = true;
                return Err(e);
            }
        };
        let command = controller.execute(params, dt);
        let speeds = self.drive.wheel_speeds(&command);
        self.last_command = command;

        debug!(
            "cycle: {} -> v {:.4}, omega {:.4}, wheels ({:.4}, {:.4})",
            active, command.linear, command.angular, speeds.left, speeds.right
        );
        Ok(speeds)
    }

    fn refresh_and_switch(&mut self, info: &RobotInfo) -> Result<ControllerId> {
        let pose = self.robot.estimate_pose(self.params.pose(), info);
        let frame = self.robot.sensor_frame(info)?;
        self.params.refresh(pose, frame)?;

        let next = self.policy.get_controller_state(&self.params, self.active);
        if !self.registry.contains(next) {
            return Err(ControlError::UnknownController(next));
        }
        if next != self.active {
            if next == ControllerId::Hold {
                info!(
                    "goal reached at ({:.3}, {:.3}), switching from {} to hold",
                    pose.x, pose.y, self.active
                );
            } else {
                info!("switching from {} to {}", self.active, next);
            }
            self.active = next;
        }
        Ok(next)
    }

    /// Mark the supervisor halted when a step fails fatally
    fn guard<T>(&mut self, step: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        step(self).map_err(|e| {
            if e.is_fatal() {
                error!("control cycle failed: {}", e);
                self.halted = true;
            }
            e
        })
    }

    /// Apply new goal, cruise velocity and gains; resets every controller's
    /// error state.
    pub fn set_parameters(&mut self, params: ControlParams) -> Result<()> {
        params.validate()?;
        for controller in self.registry.iter_mut() {
            controller.set_parameters(params.gains)?;
        }
        self.params.apply(params)?;
        debug!("parameters updated: {:?}", params);
        Ok(())
    }

    pub fn get_parameters(&self) -> ControlParams {
        self.params.control_params()
    }

    /// Clear every controller's error state and the robot's telemetry history
    pub fn reset(&mut self) {
        for controller in self.registry.iter_mut() {
            controller.reset();
        }
        self.robot.reset();
    }

    /// The cycle context as of the last `process`
    pub fn params(&self) -> &CycleParams {
        &self.params
    }

    pub fn active_controller(&self) -> ControllerId {
        self.active
    }

    /// Blend weight of the last cycle, when the active controller blends
    pub fn blend_weight(&self) -> Option<f64> {
        self.registry
            .get(self.active)
            .ok()
            .and_then(|controller| controller.blend_weight())
    }

    /// Velocity command of the last executed cycle
    pub fn last_command(&self) -> VelocityCommand {
        self.last_command
    }

    pub fn registered(&self) -> impl Iterator<Item = ControllerId> + '_ {
        self.registry.ids()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn robot(&self) -> &R {
        &self.robot
    }
}
