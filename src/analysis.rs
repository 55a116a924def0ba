//! Headless analysis: replay a whole signal through the producer/consumer
//! loop at a fixed frame rate and collect the spawns.

use glam::Vec2;

use crate::audio::SampleBuffer;
use crate::keycap::KeycapLayout;
use crate::params::{EnvelopeConfig, RenderConfig, SpawnConfig};
use crate::spawner::EnvelopeSpawner;

/// One spawn observed during an offline run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRecord {
    /// Frame index the spawn happened on
    pub frame: usize,
    /// Signal time at the end of that frame (seconds)
    pub time_s: f32,
    /// Window peak that triggered it
    pub peak: f32,
    /// Envelope at the newest sample
    pub envelope_now: f32,
    pub position: Vec2,
}

/// Offline run settings
#[derive(Debug, Clone)]
pub struct OfflineRun {
    pub envelope: EnvelopeConfig,
    pub spawn: SpawnConfig,
    pub render: RenderConfig,
    /// Simulated frame rate (frames per second)
    pub fps: f32,
}

impl Default for OfflineRun {
    fn default() -> Self {
        Self {
            envelope: EnvelopeConfig::default(),
            spawn: SpawnConfig::default(),
            render: RenderConfig::default(),
            fps: 60.0,
        }
    }
}

impl OfflineRun {
    /// Feed `samples` one frame's worth at a time into a fresh window and run
    /// one spawner cycle per frame.
    ///
    /// Runs until the signal is exhausted; a trailing partial frame still
    /// counts as a frame.
    pub fn run(&self, samples: &[f32]) -> Vec<SpawnRecord> {
        let buffer = SampleBuffer::new(self.envelope.max_samples());
        let mut spawner = EnvelopeSpawner::new(&self.envelope, &self.spawn);
        let layout = KeycapLayout::new(
            self.render.window_width as f32,
            self.render.window_height as f32,
            &self.render,
        );

        let dt_s = 1.0 / self.fps;
        let samples_per_frame = ((self.envelope.sample_rate_hz as f32 / self.fps).round() as usize).max(1);

        let mut records = Vec::new();
        let mut consumed = 0;
        for (frame, block) in samples.chunks(samples_per_frame).enumerate() {
            buffer.push(block);
            consumed += block.len();

            let report = spawner.update(&buffer, dt_s, &layout);
            if let Some(event) = report.spawn {
                records.push(SpawnRecord {
                    frame,
                    time_s: consumed as f32 / self.envelope.sample_rate_hz as f32,
                    peak: report.peak.value,
                    envelope_now: report.latest,
                    position: event.position,
                });
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_never_spawns() {
        let run = OfflineRun::default();
        assert!(run.run(&vec![0.0; 44100]).is_empty());
    }

    #[test]
    fn test_empty_signal_gives_no_records() {
        assert!(OfflineRun::default().run(&[]).is_empty());
    }

    #[test]
    fn test_single_hit_spawns_once_then_window_holds_peak() {
        let run = OfflineRun {
            spawn: SpawnConfig {
                interval_s: 10.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut samples = vec![0.0; 44100];
        samples[100] = 1.0;

        let records = run.run(&samples);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].frame, 0);
        assert_eq!(records[0].peak, 1.0);
    }
}
