//! Spawn gate configuration.

use crate::error::{BloodlaneError, Result};

/// Threshold and rate limit for envelope-triggered spawns
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    /// Envelope level the window peak must exceed (linear amplitude)
    pub threshold: f32,

    /// Minimum time between spawns (seconds)
    pub interval_s: f32,

    /// Threshold change per key press
    pub threshold_step: f32,

    /// Interval change per key press (seconds)
    pub interval_step_s: f32,

    /// Floor for the spawn interval (seconds)
    pub min_interval_s: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            interval_s: 0.5,
            threshold_step: 0.05,
            interval_step_s: 0.05,
            min_interval_s: 0.05,
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold >= 0.0) {
            return Err(BloodlaneError::InvalidConfig(format!(
                "threshold must be >= 0, got {}",
                self.threshold
            )));
        }
        if !(self.min_interval_s > 0.0) {
            return Err(BloodlaneError::InvalidConfig(
                "minimum spawn interval must be > 0".to_string(),
            ));
        }
        if !(self.interval_s >= self.min_interval_s) {
            return Err(BloodlaneError::InvalidConfig(format!(
                "spawn interval {}s is below the {}s floor",
                self.interval_s, self.min_interval_s
            )));
        }
        Ok(())
    }
}
