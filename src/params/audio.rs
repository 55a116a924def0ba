//! Audio capture and envelope configuration.

use crate::error::{BloodlaneError, Result};

/// Longest rolling window accepted (seconds)
pub const MAX_WINDOW_SECS: f32 = 600.0;

/// Envelope follower and sample window configuration
#[derive(Debug, Clone)]
pub struct EnvelopeConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Release time constant (seconds)
    /// 0.034 = 34ms, fast enough to separate drum hits
    pub release_time_s: f32,

    /// Length of the rolling sample window (seconds)
    pub window_secs: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            release_time_s: 0.034,
            window_secs: 5.0,
        }
    }
}

impl EnvelopeConfig {
    /// Per-sample release multiplier: `exp(-1 / (release * sample_rate))`
    pub fn alpha(&self) -> f32 {
        (-1.0 / (self.release_time_s * self.sample_rate_hz as f32)).exp()
    }

    /// Capacity of the rolling sample window
    pub fn max_samples(&self) -> usize {
        (self.sample_rate_hz as f32 * self.window_secs) as usize
    }

    /// Validate configuration (positive rate, release and window)
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate_hz == 0 {
            return Err(BloodlaneError::InvalidConfig(
                "sample rate must be > 0".to_string(),
            ));
        }
        if !(self.release_time_s > 0.0) {
            return Err(BloodlaneError::InvalidConfig(format!(
                "release time must be > 0, got {}",
                self.release_time_s
            )));
        }
        if !self.window_secs.is_finite() || self.window_secs > MAX_WINDOW_SECS {
            return Err(BloodlaneError::InvalidConfig(format!(
                "window must be at most {}s, got {}",
                MAX_WINDOW_SECS, self.window_secs
            )));
        }
        if self.max_samples() == 0 {
            return Err(BloodlaneError::InvalidConfig(format!(
                "window of {}s holds no samples",
                self.window_secs
            )));
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Synth block size (samples per buffer)
    /// 128 = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;

    /// Feeder chunk sizes cycled by the file source, to mimic the uneven
    /// callback sizes real drivers deliver
    pub const FILE_CHUNK_SIZES: [usize; 4] = [256, 512, 384, 128];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_five_seconds() {
        let config = EnvelopeConfig::default();
        assert_eq!(config.max_samples(), 44100 * 5);
    }

    #[test]
    fn test_alpha_is_just_below_one() {
        let alpha = EnvelopeConfig::default().alpha();

        // 34ms at 44.1kHz is ~1500 samples per time constant
        assert!(alpha < 1.0);
        assert!(alpha > 0.999);
    }

    #[test]
    fn test_validate_rejects_zero_release() {
        let config = EnvelopeConfig {
            release_time_s: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(EnvelopeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unbounded_window() {
        let infinite = EnvelopeConfig {
            window_secs: f32::INFINITY,
            ..Default::default()
        };
        assert!(infinite.validate().is_err());

        let nan = EnvelopeConfig {
            window_secs: f32::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());

        let huge = EnvelopeConfig {
            window_secs: 100_000.0,
            ..Default::default()
        };
        assert!(huge.validate().is_err());

        let longest = EnvelopeConfig {
            window_secs: MAX_WINDOW_SECS,
            ..Default::default()
        };
        assert!(longest.validate().is_ok());
    }
}
