//! The controller library
pub mod avoid_obstacles;
pub mod blending;
pub mod go_to_goal;
pub mod hold;

pub use self::avoid_obstacles::AvoidObstacles;
pub use self::blending::BlendGtgAvoid;
pub use self::go_to_goal::GoToGoal;
pub use self::hold::Hold;
