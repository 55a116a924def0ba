//! Envelope-triggered spawning: threshold and cooldown gate plus the
//! per-frame analysis cycle that drives it.

use glam::Vec2;

use crate::audio::{find_peak, EnvelopeFollower, Peak, SampleBuffer};
use crate::keycap::KeycapLayout;
use crate::params::{EnvelopeConfig, SpawnConfig};

/// A spawned particle: where it is and how long it has existed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnEvent {
    /// Window position (pixels)
    pub position: Vec2,

    /// Time since spawn (seconds)
    pub age_s: f32,
}

/// Threshold + cooldown gate allowing at most one spawn per cycle
#[derive(Debug, Clone)]
pub struct SpawnGate {
    threshold: f32,
    interval_s: f32,
    cooldown_s: f32,
    config: SpawnConfig,
}

impl SpawnGate {
    /// New gate with an expired cooldown, so the first loud frame spawns
    pub fn new(config: &SpawnConfig) -> Self {
        Self {
            threshold: config.threshold.max(0.0),
            interval_s: config.interval_s.max(config.min_interval_s),
            cooldown_s: 0.0,
            config: config.clone(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn interval_s(&self) -> f32 {
        self.interval_s
    }

    /// Remaining cooldown (seconds); negative once expired
    pub fn cooldown_s(&self) -> f32 {
        self.cooldown_s
    }

    /// Advance the cooldown by `dt_s` and decide whether to fire.
    ///
    /// Fires when there is data, `peak` is strictly above the threshold and
    /// the cooldown has run out; firing resets the cooldown to the interval.
    pub fn tick(&mut self, dt_s: f32, peak: f32, has_samples: bool) -> bool {
        self.cooldown_s -= dt_s;

        if has_samples && peak > self.threshold && self.cooldown_s <= 0.0 {
            self.cooldown_s = self.interval_s;
            true
        } else {
            false
        }
    }

    pub fn raise_threshold(&mut self) -> f32 {
        self.threshold += self.config.threshold_step;
        self.threshold
    }

    /// Lower the threshold one step, never below zero
    pub fn lower_threshold(&mut self) -> f32 {
        self.threshold = (self.threshold - self.config.threshold_step).max(0.0);
        self.threshold
    }

    /// Shorten the interval one step, never below the configured floor
    pub fn shorten_interval(&mut self) -> f32 {
        self.interval_s =
            (self.interval_s - self.config.interval_step_s).max(self.config.min_interval_s);
        self.interval_s
    }

    pub fn lengthen_interval(&mut self) -> f32 {
        self.interval_s += self.config.interval_step_s;
        self.interval_s
    }
}

/// Outcome of one analysis cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Loudest envelope point in the window
    pub peak: Peak,

    /// Envelope at the newest sample (0 for an empty window)
    pub latest: f32,

    /// Number of samples analysed
    pub samples: usize,

    pub spawn: Option<SpawnEvent>,
}

/// Consumer side of the pipeline: snapshot, envelope, peak, gate
pub struct EnvelopeSpawner {
    follower: EnvelopeFollower,
    gate: SpawnGate,
    snapshot: Vec<f32>,
    envelope: Vec<f32>,
}

impl EnvelopeSpawner {
    pub fn new(envelope_config: &EnvelopeConfig, spawn_config: &SpawnConfig) -> Self {
        Self {
            follower: EnvelopeFollower::new(envelope_config),
            gate: SpawnGate::new(spawn_config),
            snapshot: Vec::new(),
            envelope: Vec::new(),
        }
    }

    pub fn gate(&self) -> &SpawnGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut SpawnGate {
        &mut self.gate
    }

    /// Envelope computed by the last cycle
    pub fn envelope(&self) -> &[f32] {
        &self.envelope
    }

    /// Run one cycle against the shared window.
    ///
    /// The lock is held only while copying; the envelope is computed on the
    /// copy.
    pub fn update(&mut self, buffer: &SampleBuffer, dt_s: f32, layout: &KeycapLayout) -> FrameReport {
        buffer.snapshot_into(&mut self.snapshot);
        self.analyze(dt_s, layout)
    }

    /// Run one cycle against an explicit sample window
    pub fn update_with_samples(
        &mut self,
        samples: &[f32],
        dt_s: f32,
        layout: &KeycapLayout,
    ) -> FrameReport {
        self.snapshot.clear();
        self.snapshot.extend_from_slice(samples);
        self.analyze(dt_s, layout)
    }

    fn analyze(&mut self, dt_s: f32, layout: &KeycapLayout) -> FrameReport {
        self.follower.follow_into(&self.snapshot, &mut self.envelope);
        debug_assert_eq!(self.envelope.len(), self.snapshot.len());

        let peak = find_peak(&self.envelope);
        let latest = self.envelope.last().copied().unwrap_or(0.0);
        let fired = self.gate.tick(dt_s, peak.value, !self.envelope.is_empty());

        // Position follows the newest sample, not the peak, so particles
        // line up with the live edge of the trace.
        let spawn = fired.then(|| SpawnEvent {
            position: Vec2::new(layout.spawn_x(), layout.envelope_to_y(latest)),
            age_s: 0.0,
        });

        FrameReport {
            peak,
            latest,
            samples: self.envelope.len(),
            spawn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RenderConfig;

    fn layout() -> KeycapLayout {
        KeycapLayout::new(800.0, 600.0, &RenderConfig::default())
    }

    fn gate() -> SpawnGate {
        SpawnGate::new(&SpawnConfig::default())
    }

    #[test]
    fn test_gate_fires_once_per_interval() {
        let mut gate = gate();
        let dt = 0.125;

        let fired: Vec<bool> = (0..16).map(|_| gate.tick(dt, 0.9, true)).collect();
        let count = fired.iter().filter(|&&f| f).count();

        assert_eq!(count, 4);
        assert!(fired[0] && fired[4] && fired[8] && fired[12]);
    }

    #[test]
    fn test_gate_requires_strictly_greater_peak() {
        let mut gate = gate();
        assert!(!gate.tick(0.1, 0.8, true));
        assert!(gate.tick(0.1, 0.81, true));
    }

    #[test]
    fn test_gate_requires_samples() {
        let mut gate = gate();
        assert!(!gate.tick(0.1, 1.0, false));
    }

    #[test]
    fn test_cooldown_resets_exactly_on_spawn() {
        let mut gate = gate();
        gate.tick(0.3, 0.0, true);
        assert!((gate.cooldown_s() + 0.3).abs() < 1e-6);

        assert!(gate.tick(0.1, 1.0, true));
        assert_eq!(gate.cooldown_s(), gate.interval_s());
    }

    #[test]
    fn test_threshold_floor_is_zero() {
        let mut gate = SpawnGate::new(&SpawnConfig {
            threshold: 0.07,
            ..Default::default()
        });
        gate.lower_threshold();
        assert_eq!(gate.lower_threshold(), 0.0);
        assert!((gate.raise_threshold() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_interval_floor() {
        let mut gate = SpawnGate::new(&SpawnConfig {
            interval_s: 0.1,
            ..Default::default()
        });
        gate.shorten_interval();
        assert_eq!(gate.shorten_interval(), 0.05);
        assert!((gate.lengthen_interval() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_position_uses_latest_sample() {
        // Very short release so the early hit has decayed by the end
        let envelope_config = EnvelopeConfig {
            release_time_s: 0.0001,
            ..Default::default()
        };
        let mut spawner = EnvelopeSpawner::new(&envelope_config, &SpawnConfig::default());
        let layout = layout();

        // Loud hit early in the window, quieter signal at the end
        let mut samples = vec![1.0];
        samples.extend(std::iter::repeat(0.0).take(20));
        samples.push(0.3);
        let report = spawner.update_with_samples(&samples, 0.016, &layout);

        assert_eq!(report.peak.index, 0);
        assert_eq!(report.latest, 0.3);
        let spawn = report.spawn.expect("peak above threshold should spawn");
        assert_eq!(spawn.position.x, layout.spawn_x());
        assert_eq!(spawn.position.y, layout.envelope_to_y(0.3));
        assert_eq!(spawn.age_s, 0.0);
    }

    #[test]
    fn test_empty_window_never_spawns() {
        let mut spawner = EnvelopeSpawner::new(&EnvelopeConfig::default(), &SpawnConfig {
            threshold: 0.0,
            ..Default::default()
        });
        let report = spawner.update(&SampleBuffer::new(16), 0.016, &layout());

        assert_eq!(report.samples, 0);
        assert!(report.spawn.is_none());
        assert!(spawner.envelope().is_empty());
    }

    #[test]
    fn test_update_reads_shared_buffer() {
        let buffer = SampleBuffer::new(64);
        buffer.push(&[0.2, 0.95, 0.1]);
        let mut spawner = EnvelopeSpawner::new(&EnvelopeConfig::default(), &SpawnConfig::default());

        let report = spawner.update(&buffer, 0.016, &layout());

        assert_eq!(spawner.envelope().len(), 3);
        assert_eq!(report.peak.value, 0.95);
        assert!(report.spawn.is_some());
    }
}
