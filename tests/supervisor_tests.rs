use approx::assert_relative_eq;
use diffbot_core::perception::PoseEstimator;
use diffbot_core::{
    BeamLayout, BlendUntilGoal, ControlError, ControllerId, DiffDriveRobot, GoalOrObstacle, Gains,
    Goal, Khepera3, Pose, Robot, RobotGeometry, RobotInfo, Supervisor, SupervisorConfig,
    WheelTicks,
};
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const WHEEL_BASE: f64 = 0.2;

fn geometry() -> RobotGeometry {
    RobotGeometry {
        wheel_base: WHEEL_BASE,
        wheel_radius: 0.03,
        ticks_per_revolution: 1000.0,
        beams: BeamLayout::from_degrees(&[90.0, 45.0, 0.0, -45.0, -90.0], 0.02, 0.5).unwrap(),
    }
}

fn clear_at(pose: Pose) -> RobotInfo {
    RobotInfo::new(WheelTicks::default(), vec![0.5; 5]).with_position_fix(pose)
}

fn config(goal: Goal) -> SupervisorConfig {
    SupervisorConfig {
        goal,
        gains: Gains::new(5.0, 0.1, 0.01),
        velocity: 0.2,
        max_wheel_speed: 1.0,
        safety_distance: 0.1,
        controllers: vec![ControllerId::Blended, ControllerId::Hold],
    }
}

/// Passes the fix through and counts how often it is asked for a pose
#[derive(Debug)]
struct CountingEstimator {
    calls: Arc<AtomicUsize>,
}

impl PoseEstimator for CountingEstimator {
    fn estimate(&mut self, previous: Pose, info: &RobotInfo) -> Pose {
        self.calls.fetch_add(1, Ordering::SeqCst);
        info.position_fix.unwrap_or(previous)
    }

    fn reset(&mut self) {}
}

#[test]
fn hold_is_irreversible_once_goal_is_reached() {
    let robot = DiffDriveRobot::new(geometry()).unwrap();
    let mut supervisor =
        Supervisor::new(robot, config(Goal::new(1.0, 0.0)), BlendUntilGoal).unwrap();

    supervisor.execute(&clear_at(Pose::new(0.0, 0.0, 0.0)), 0.1).unwrap();
    assert_eq!(supervisor.active_controller(), ControllerId::Blended);

    // inside half a wheel base of the goal
    let speeds = supervisor.execute(&clear_at(Pose::new(0.95, 0.0, 0.0)), 0.1).unwrap();
    assert_eq!(supervisor.active_controller(), ControllerId::Hold);
    assert_eq!((speeds.left, speeds.right), (0.0, 0.0));

    // pushed far away again, with an obstacle in view
    for _ in 0..10 {
        let info = RobotInfo::new(WheelTicks::default(), vec![0.5, 0.5, 0.05, 0.5, 0.5])
            .with_position_fix(Pose::new(-3.0, 2.0, 1.0));
        let speeds = supervisor.execute(&info, 0.1).unwrap();
        assert_eq!(supervisor.active_controller(), ControllerId::Hold);
        assert_eq!((speeds.left, speeds.right), (0.0, 0.0));
    }
    assert!(supervisor.params().distance_to_goal() > WHEEL_BASE / 2.0);
}

#[test]
fn reference_scenario_turns_toward_goal() {
    let robot = DiffDriveRobot::new(geometry()).unwrap();
    let mut supervisor =
        Supervisor::new(robot, config(Goal::new(11.0, 10.0)), BlendUntilGoal).unwrap();

    let speeds = supervisor.execute(&clear_at(Pose::default()), 0.1).unwrap();
    let command = supervisor.last_command();

    assert_eq!(supervisor.blend_weight(), Some(0.0));
    assert!(command.angular > 0.0);
    assert!(speeds.right > speeds.left);
}

#[test]
fn pose_is_estimated_once_per_cycle() {
    let calls = Arc::new(AtomicUsize::new(0));
    let robot = DiffDriveRobot::with_estimator(
        geometry(),
        CountingEstimator {
            calls: Arc::clone(&calls),
        },
    )
    .unwrap();
    let mut supervisor =
        Supervisor::new(robot, config(Goal::new(1.0, 1.0)), BlendUntilGoal).unwrap();

    for cycle in 1..=7 {
        supervisor
            .execute(&clear_at(Pose::new(0.01 * cycle as f64, 0.0, 0.0)), 0.1)
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), cycle);
    }
    assert_relative_eq!(supervisor.params().pose().x, 0.07);
}

#[rstest]
#[case(vec![0.5, 0.5, 0.5, 0.5, 0.5], ControllerId::GoToGoal)]
#[case(vec![0.5, 0.5, 0.08, 0.5, 0.5], ControllerId::AvoidObstacles)]
#[case(vec![0.5, 0.14, 0.5, 0.5, 0.5], ControllerId::GoToGoal)]
fn hard_switching_picks_one_controller(#[case] readings: Vec<f64>, #[case] expected: ControllerId) {
    let robot = DiffDriveRobot::new(geometry()).unwrap();
    let config = SupervisorConfig {
        controllers: vec![
            ControllerId::GoToGoal,
            ControllerId::AvoidObstacles,
            ControllerId::Hold,
        ],
        ..config(Goal::new(2.0, 0.0))
    };
    let mut supervisor = Supervisor::new(robot, config, GoalOrObstacle::new(0.12).unwrap()).unwrap();

    let info = RobotInfo::new(WheelTicks::default(), readings).with_position_fix(Pose::default());
    supervisor.execute(&info, 0.1).unwrap();
    assert_eq!(supervisor.active_controller(), expected);
    assert_eq!(supervisor.blend_weight(), None);
}

#[test]
fn blend_policy_without_blended_controller_is_fatal() {
    let robot = DiffDriveRobot::new(geometry()).unwrap();
    let config = SupervisorConfig {
        controllers: vec![ControllerId::GoToGoal, ControllerId::Hold],
        ..config(Goal::new(2.0, 0.0))
    };
    let mut supervisor = Supervisor::new(robot, config, BlendUntilGoal).unwrap();

    assert_eq!(
        supervisor.execute(&clear_at(Pose::default()), 0.1).unwrap_err(),
        ControlError::UnknownController(ControllerId::Blended)
    );
    assert_eq!(
        supervisor.execute(&clear_at(Pose::default()), 0.1).unwrap_err(),
        ControlError::Halted
    );
}

#[test]
fn invalid_config_fails_at_construction() {
    let robot = DiffDriveRobot::new(geometry()).unwrap();
    let config = SupervisorConfig {
        goal: Goal::new(f64::INFINITY, 0.0),
        ..config(Goal::new(0.0, 0.0))
    };
    assert!(matches!(
        Supervisor::new(robot, config, BlendUntilGoal),
        Err(ControlError::InvalidParameter { name: "goal", .. })
    ));
}

#[test]
fn zero_dt_cycle_is_degraded_not_fatal() {
    let robot = DiffDriveRobot::new(geometry()).unwrap();
    let mut supervisor =
        Supervisor::new(robot, config(Goal::new(0.0, 1.0)), BlendUntilGoal).unwrap();

    let speeds = supervisor.execute(&clear_at(Pose::default()), 0.0).unwrap();
    assert!(speeds.left.is_finite() && speeds.right.is_finite());
    assert!(!supervisor.is_halted());
}

#[test]
fn wheel_speeds_respect_limit_and_turn_ratio() {
    let robot = DiffDriveRobot::new(geometry()).unwrap();
    let config = SupervisorConfig {
        max_wheel_speed: 0.1,
        ..config(Goal::new(-1.0, 0.5))
    };
    let mut supervisor = Supervisor::new(robot, config, BlendUntilGoal).unwrap();

    let speeds = supervisor.execute(&clear_at(Pose::default()), 0.1).unwrap();
    let command = supervisor.last_command();
    let raw_left = command.linear - command.angular * WHEEL_BASE / 2.0;
    let raw_right = command.linear + command.angular * WHEEL_BASE / 2.0;

    assert_relative_eq!(speeds.left.abs().max(speeds.right.abs()), 0.1, epsilon = 1e-12);
    assert_relative_eq!(speeds.left / speeds.right, raw_left / raw_right, epsilon = 1e-9);
}

#[test]
fn khepera_drives_from_encoder_ticks() {
    let robot = Khepera3::new().unwrap();
    let meters_per_tick = robot.geometry().meters_per_tick();
    let config = SupervisorConfig {
        goal: Goal::new(1.0, 0.0),
        ..Default::default()
    };
    let mut supervisor = Supervisor::new(robot, config, BlendUntilGoal).unwrap();

    let no_obstacles = vec![0.0; 9];
    supervisor
        .execute(&RobotInfo::new(WheelTicks::default(), no_obstacles.clone()), 0.1)
        .unwrap();

    // both wheels advance 10 cm
    let ticks = (0.1 / meters_per_tick).round() as i64;
    supervisor
        .execute(
            &RobotInfo::new(
                WheelTicks {
                    left: ticks,
                    right: ticks,
                },
                no_obstacles,
            ),
            0.1,
        )
        .unwrap();

    let pose = supervisor.params().pose();
    assert_relative_eq!(pose.x, 0.1, epsilon = 1e-4);
    assert_relative_eq!(pose.theta, 0.0, epsilon = 1e-12);
    assert_eq!(supervisor.active_controller(), ControllerId::Blended);
}

#[test]
fn reset_clears_error_state_but_keeps_parameters() {
    let robot = DiffDriveRobot::new(geometry()).unwrap();
    let mut supervisor =
        Supervisor::new(robot, config(Goal::new(0.0, 1.0)), BlendUntilGoal).unwrap();
    for _ in 0..5 {
        supervisor.execute(&clear_at(Pose::default()), 0.1).unwrap();
    }
    let params = supervisor.get_parameters();
    supervisor.reset();
    assert_eq!(supervisor.get_parameters(), params);

    // with no history the first cycle matches a fresh supervisor
    let fresh_robot = DiffDriveRobot::new(geometry()).unwrap();
    let mut fresh =
        Supervisor::new(fresh_robot, config(Goal::new(0.0, 1.0)), BlendUntilGoal).unwrap();
    supervisor.execute(&clear_at(Pose::default()), 0.1).unwrap();
    fresh.execute(&clear_at(Pose::default()), 0.1).unwrap();
    assert_relative_eq!(supervisor.last_command().angular, fresh.last_command().angular);
}

#[test]
fn khepera_keeps_driving_with_obstacle_only_behind() {
    let robot = Khepera3::new().unwrap();
    let config = SupervisorConfig {
        goal: Goal::new(1.0, 0.0),
        ..Default::default()
    };
    let mut supervisor = Supervisor::new(robot, config, BlendUntilGoal).unwrap();

    // rear beam saturated, everything else clear
    let mut readings = vec![0.0; 9];
    readings[8] = 3960.0;
    let info = RobotInfo::new(WheelTicks::default(), readings);

    for _ in 0..50 {
        let speeds = supervisor.execute(&info, 0.1).unwrap();
        assert_relative_eq!(supervisor.blend_weight().unwrap(), 1.0);
        assert!(speeds.left > 0.0 && speeds.right > 0.0);
        assert_relative_eq!(speeds.left, speeds.right, epsilon = 1e-9);
    }
}
