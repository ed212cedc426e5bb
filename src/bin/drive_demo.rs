use anyhow::{Context, Result};
use diffbot_core::robot::khepera::{self, Khepera3};
use diffbot_core::{
    BlendUntilGoal, ControllerId, Goal, Pose, Robot, RobotGeometry, RobotInfo, Supervisor,
    SupervisorConfig, WheelSpeeds, WheelTicks,
};
use log::info;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

const DT: f64 = 0.05;
const MAX_CYCLES: usize = 600;

/// A round obstacle in the world frame
struct Obstacle {
    x: f64,
    y: f64,
    radius: f64,
}

impl Obstacle {
    /// Distance along a ray to this obstacle's edge, if the ray hits it
    fn ray_distance(&self, origin: (f64, f64), heading: f64) -> Option<f64> {
        let (ux, uy) = (heading.cos(), heading.sin());
        let (fx, fy) = (origin.0 - self.x, origin.1 - self.y);
        let b = fx * ux + fy * uy;
        let c = fx * fx + fy * fy - self.radius * self.radius;
        if c < 0.0 {
            return Some(0.0);
        }
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        (t >= 0.0).then_some(t)
    }
}

/// Stands in for the platform: keeps the true pose and the encoder counters
struct Host {
    pose: Pose,
    left_ticks: f64,
    right_ticks: f64,
    obstacles: Vec<Obstacle>,
}

impl Host {
    fn new(obstacles: Vec<Obstacle>) -> Self {
        Host {
            pose: Pose::default(),
            left_ticks: 0.0,
            right_ticks: 0.0,
            obstacles,
        }
    }

    /// Raw IR intensities the Khepera would report from the true pose
    fn telemetry(&self, geometry: &RobotGeometry) -> RobotInfo {
        let max_range = geometry.beams.max_range();
        let readings = geometry
            .beams
            .angles()
            .iter()
            .map(|angle| {
                let distance = self
                    .obstacles
                    .iter()
                    .filter_map(|o| o.ray_distance((self.pose.x, self.pose.y), self.pose.theta + angle))
                    .fold(max_range, f64::min);
                if distance >= max_range {
                    0.0
                } else {
                    3960.0 * (-30.0 * (distance - khepera::IR_MIN_RANGE)).exp()
                }
            })
            .collect();

        let ticks = WheelTicks {
            left: self.left_ticks.round() as i64,
            right: self.right_ticks.round() as i64,
        };
        RobotInfo::new(ticks, readings)
    }

    fn apply(&mut self, speeds: WheelSpeeds, geometry: &RobotGeometry, dt: f64) {
        let left = speeds.left * dt;
        let right = speeds.right * dt;
        self.left_ticks += left / geometry.meters_per_tick();
        self.right_ticks += right / geometry.meters_per_tick();

        let distance = (left + right) / 2.0;
        let delta_theta = (right - left) / geometry.wheel_base;
        let heading = self.pose.theta + delta_theta / 2.0;
        self.pose.x += distance * heading.cos();
        self.pose.y += distance * heading.sin();
        self.pose.theta += delta_theta;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let robot = Khepera3::new().context("Failed to build Khepera III model")?;
    let geometry = robot.geometry().clone();
    let config = SupervisorConfig {
        goal: Goal::new(0.6, 0.4),
        velocity: 0.1,
        max_wheel_speed: khepera::MAX_WHEEL_SPEED,
        ..Default::default()
    };
    info!("Driving to ({}, {})", config.goal.x, config.goal.y);

    let mut supervisor =
        Supervisor::new(robot, config, BlendUntilGoal).context("Failed to build supervisor")?;
    let mut host = Host::new(vec![Obstacle {
        x: 0.3,
        y: 0.2,
        radius: 0.04,
    }]);

    let mut heartbeat = interval(Duration::from_secs_f64(DT));
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Skip);

    for cycle in 0..MAX_CYCLES {
        heartbeat.tick().await;

        let info = host.telemetry(&geometry);
        let speeds = supervisor
            .execute(&info, DT)
            .with_context(|| format!("Control cycle {} failed", cycle))?;
        host.apply(speeds, &geometry, DT);

        if cycle % 20 == 0 {
            let estimate = supervisor.params().pose();
            info!(
                "cycle {}: {} estimate ({:.3}, {:.3}, {:.2}) truth ({:.3}, {:.3}) blend {:?}",
                cycle,
                supervisor.active_controller(),
                estimate.x,
                estimate.y,
                estimate.theta,
                host.pose.x,
                host.pose.y,
                supervisor.blend_weight()
            );
        }

        if supervisor.active_controller() == ControllerId::Hold {
            info!("Goal reached after {} cycles", cycle + 1);
            return Ok(());
        }
    }

    info!("Stopped after {} cycles without reaching the goal", MAX_CYCLES);
    Ok(())
}
