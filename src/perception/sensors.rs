//! Range sensor geometry and per-cycle sensor frames

use crate::error::{ensure_non_negative, ensure_positive, ControlError, Result};

/// Mounting table for a ring of range sensors, fixed at construction
#[derive(Debug, Clone, PartialEq)]
pub struct BeamLayout {
    angles: Vec<f64>,
    min_range: f64,
    max_range: f64,
}

impl BeamLayout {
    /// Create a layout from mounting angles (radians, robot frame) and the
    /// sensor's usable range.
    pub fn new(angles: Vec<f64>, min_range: f64, max_range: f64) -> Result<Self> {
        if angles.is_empty() {
            return Err(ControlError::invalid("beam_angles", "at least one beam is required"));
        }
        if angles.iter().any(|a| !a.is_finite()) {
            return Err(ControlError::invalid("beam_angles", "mounting angles must be finite"));
        }
        ensure_non_negative("min_range", min_range)?;
        ensure_positive("max_range", max_range)?;
        if min_range >= max_range {
            return Err(ControlError::invalid(
                "min_range",
                format!("must be below max_range ({} >= {})", min_range, max_range),
            ));
        }

        Ok(BeamLayout {
            angles,
            min_range,
            max_range,
        })
    }

    /// Same as [`BeamLayout::new`] with the angles given in degrees
    pub fn from_degrees(angles: &[f64], min_range: f64, max_range: f64) -> Result<Self> {
        Self::new(angles.iter().map(|a| a.to_radians()).collect(), min_range, max_range)
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    pub fn min_range(&self) -> f64 {
        self.min_range
    }

    pub fn max_range(&self) -> f64 {
        self.max_range
    }

    /// Pair distances with their mounting angles.
    ///
    /// Distances are clamped into `[min_range, max_range]`; a non-finite
    /// reading means "no return" and is reported as `max_range`.
    pub fn frame(&self, distances: &[f64]) -> Result<SensorFrame> {
        if distances.len() != self.angles.len() {
            return Err(ControlError::SensorIndexMismatch {
                expected: self.angles.len(),
                actual: distances.len(),
            });
        }

        let readings = distances
            .iter()
            .zip(&self.angles)
            .map(|(&distance, &angle)| {
                let distance = if distance.is_finite() {
                    distance.clamp(self.min_range, self.max_range)
                } else {
                    self.max_range
                };
                SensorReading { distance, angle }
            })
            .collect();

        Ok(SensorFrame { readings })
    }

    /// A frame where every beam reports no obstacle
    pub fn clear_frame(&self) -> SensorFrame {
        SensorFrame {
            readings: self
                .angles
                .iter()
                .map(|&angle| SensorReading {
                    distance: self.max_range,
                    angle,
                })
                .collect(),
        }
    }
}

/// One beam's distance and mounting angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub distance: f64,
    /// Mounting angle in the robot frame (radians)
    pub angle: f64,
}

/// Snapshot of all beams for one control cycle, aligned with its [`BeamLayout`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorFrame {
    readings: Vec<SensorReading>,
}

impl SensorFrame {
    pub fn readings(&self) -> &[SensorReading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Reading with the smallest distance
    pub fn nearest(&self) -> Option<SensorReading> {
        self.readings
            .iter()
            .copied()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    pub fn distances(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(|r| r.distance)
    }
}
