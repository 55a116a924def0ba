//! Peak envelope follower and window peak detection.

use crate::params::EnvelopeConfig;

/// One-pole peak follower: instant attack, exponential release.
///
/// Negative samples are rectified to zero before following, so the envelope
/// tracks positive excursions only.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeFollower {
    alpha: f32,
}

impl EnvelopeFollower {
    pub fn new(config: &EnvelopeConfig) -> Self {
        Self {
            alpha: config.alpha(),
        }
    }

    /// Build a follower from a release time and sample rate directly
    pub fn with_release(release_time_s: f32, sample_rate_hz: u32) -> Self {
        Self::new(&EnvelopeConfig {
            sample_rate_hz,
            release_time_s,
            ..Default::default()
        })
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Recompute the whole envelope for `samples` into `envelope`.
    ///
    /// `envelope` is resized to `samples.len()`; the follower starts from 0
    /// at the first sample every time.
    pub fn follow_into(&self, samples: &[f32], envelope: &mut Vec<f32>) {
        envelope.clear();
        envelope.reserve(samples.len());

        let mut prev = 0.0f32;
        for &sample in samples {
            let rectified = sample.max(0.0);
            let env = if rectified >= prev {
                rectified
            } else {
                prev * self.alpha
            };
            envelope.push(env);
            prev = env;
        }
    }

    pub fn follow(&self, samples: &[f32]) -> Vec<f32> {
        let mut envelope = Vec::with_capacity(samples.len());
        self.follow_into(samples, &mut envelope);
        envelope
    }
}

/// Loudest point of an envelope window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Peak {
    pub value: f32,
    pub index: usize,
}

/// Find the maximum of `envelope` and where it first occurs.
///
/// The scan is seeded with `(0.0, 0)` and only moves on a strictly greater
/// value, so ties resolve to the lowest index and an empty or silent window
/// reports a zero peak at index 0.
pub fn find_peak(envelope: &[f32]) -> Peak {
    let mut peak = Peak::default();
    for (index, &value) in envelope.iter().enumerate() {
        if value > peak.value {
            peak = Peak { value, index };
        }
    }
    peak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn follower() -> EnvelopeFollower {
        EnvelopeFollower::with_release(0.034, 44100)
    }

    #[test]
    fn test_empty_input_gives_empty_envelope() {
        assert!(follower().follow(&[]).is_empty());
    }

    #[test]
    fn test_attack_is_instant() {
        let envelope = follower().follow(&[0.0, 0.3, 0.9]);
        assert_eq!(envelope, vec![0.0, 0.3, 0.9]);
    }

    #[test]
    fn test_negative_samples_are_rectified() {
        let envelope = follower().follow(&[-0.5, -1.0, 0.2]);

        assert_eq!(envelope[0], 0.0);
        assert_eq!(envelope[1], 0.0);
        assert_eq!(envelope[2], 0.2);
    }

    #[test]
    fn test_release_decays_geometrically() {
        let f = follower();
        let envelope = f.follow(&[1.0, 0.0, 0.0]);

        assert_eq!(envelope[0], 1.0);
        assert!((envelope[1] - f.alpha()).abs() < 1e-7);
        assert!((envelope[2] - f.alpha() * f.alpha()).abs() < 1e-7);
    }

    #[test]
    fn test_smaller_sample_during_release_does_not_reset() {
        let f = follower();
        let envelope = f.follow(&[1.0, 0.5]);

        // 0.5 is below the decayed value, so release continues
        assert!((envelope[1] - f.alpha()).abs() < 1e-7);
    }

    #[test]
    fn test_follow_into_reuses_and_resizes() {
        let f = follower();
        let mut envelope = vec![9.0; 32];
        f.follow_into(&[0.1, 0.2], &mut envelope);

        assert_eq!(envelope, vec![0.1, 0.2]);
    }

    #[test]
    fn test_peak_ties_resolve_to_first() {
        let peak = find_peak(&[0.1, 0.9, 0.9, 0.3]);
        assert_eq!(peak, Peak { value: 0.9, index: 1 });
    }

    #[test]
    fn test_peak_of_silence_is_zero() {
        assert_eq!(find_peak(&[]), Peak::default());
        assert_eq!(find_peak(&[0.0, 0.0]), Peak::default());
    }
}
