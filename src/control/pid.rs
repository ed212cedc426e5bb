//! PID state shared by the heading controllers

use super::params::Gains;
use log::warn;

/// Accumulated error state for one heading controller
#[derive(Debug, Clone, Default)]
pub struct HeadingPid {
    gains: Gains,
    integral: f64,
    previous_error: f64,
}

impl HeadingPid {
    pub fn new(gains: Gains) -> Self {
        HeadingPid {
            gains,
            integral: 0.0,
            previous_error: 0.0,
        }
    }

    pub fn gains(&self) -> Gains {
        self.gains
    }

    /// Replace the gains and clear the error history
    pub fn set_gains(&mut self, gains: Gains) {
        self.gains = gains;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
    }

    pub fn integral_error(&self) -> f64 {
        self.integral
    }

    pub fn previous_error(&self) -> f64 {
        self.previous_error
    }

    /// Angular velocity for the given heading error.
    ///
    /// A non-positive `dt` leaves the accumulator untouched and drops both the
    /// integral and derivative terms for this call.
    pub fn update(&mut self, error: f64, dt: f64) -> f64 {
        let proportional = self.gains.kp * error;

        let (integral, derivative) = if dt > 0.0 && dt.is_finite() {
            self.integral += error * dt;
            (
                self.gains.ki * self.integral,
                self.gains.kd * (error - self.previous_error) / dt,
            )
        } else {
            warn!("degraded control cycle: dt = {}, using proportional term only", dt);
            (0.0, 0.0)
        };

        self.previous_error = error;
        proportional + integral + derivative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.5, 0.1, 10)]
    #[case(-0.2, 0.05, 40)]
    #[case(1.0, 0.01, 1)]
    fn test_integral_accumulates_error_times_dt(
        #[case] error: f64,
        #[case] dt: f64,
        #[case] cycles: usize,
    ) {
        let mut pid = HeadingPid::new(Gains::new(1.0, 1.0, 0.0));
        for _ in 0..cycles {
            pid.update(error, dt);
        }
        assert_relative_eq!(pid.integral_error(), cycles as f64 * error * dt, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_dt_is_proportional_only() {
        let mut pid = HeadingPid::new(Gains::new(2.0, 3.0, 4.0));
        pid.update(0.5, 0.1);
        let integral = pid.integral_error();

        let output = pid.update(0.3, 0.0);
        assert_relative_eq!(output, 0.6);
        assert_relative_eq!(pid.integral_error(), integral);
        assert_relative_eq!(pid.previous_error(), 0.3);
    }

    #[test]
    fn test_derivative_uses_previous_error() {
        let mut pid = HeadingPid::new(Gains::new(0.0, 0.0, 1.0));
        pid.update(0.2, 0.1);
        assert_relative_eq!(pid.update(0.5, 0.1), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_set_gains_resets_state() {
        let mut pid = HeadingPid::new(Gains::default());
        pid.update(1.0, 0.1);
        pid.set_gains(Gains::new(1.0, 0.0, 0.0));
        assert_eq!(pid.integral_error(), 0.0);
        assert_eq!(pid.previous_error(), 0.0);
    }
}
