//! Error types for the control core

use crate::control::ControllerId;
use thiserror::Error;

/// Errors raised by controllers, the supervisor and robot specializations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// A gain, goal, geometry value or config field is missing or malformed.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The switching rule selected a controller that was never registered.
    #[error("controller {0} is not registered with this supervisor")]
    UnknownController(ControllerId),

    /// Sensor frame length does not match the configured beam table.
    #[error("sensor index mismatch: expected {expected} readings, got {actual}")]
    SensorIndexMismatch {
        /// Beam count fixed at construction.
        expected: usize,
        /// Readings actually delivered.
        actual: usize,
    },

    /// A previous cycle failed fatally; the supervisor no longer runs.
    #[error("supervisor halted after a fatal error")]
    Halted,
}

impl ControlError {
    /// Creates an invalid parameter error.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ControlError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Whether the error invalidates the supervisor instance.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ControlError::UnknownController(_)
                | ControlError::SensorIndexMismatch { .. }
                | ControlError::Halted
        )
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ControlError>;

/// Reject non-finite or negative values.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ControlError::invalid(name, format!("must be finite, got {}", value)));
    }
    if value < 0.0 {
        return Err(ControlError::invalid(name, format!("must be non-negative, got {}", value)));
    }
    Ok(())
}

/// Reject non-finite, zero or negative values.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ControlError::invalid(name, format!("must be positive, got {}", value)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ControlError::UnknownController(ControllerId::Hold).is_fatal());
        assert!(ControlError::SensorIndexMismatch { expected: 5, actual: 3 }.is_fatal());
        assert!(!ControlError::invalid("kp", "negative").is_fatal());
    }

    #[test]
    fn test_validation_helpers() {
        assert!(ensure_non_negative("ki", 0.0).is_ok());
        assert!(ensure_non_negative("ki", -0.1).is_err());
        assert!(ensure_non_negative("ki", f64::NAN).is_err());
        assert!(ensure_positive("wheel_base", 0.0).is_err());
        assert!(ensure_positive("wheel_base", 0.1).is_ok());
    }

    #[test]
    fn test_display_mentions_counts() {
        let err = ControlError::SensorIndexMismatch { expected: 9, actual: 4 };
        assert_eq!(err.to_string(), "sensor index mismatch: expected 9 readings, got 4");
    }
}
