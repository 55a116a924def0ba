//! Command-line argument parsing.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::audio::AudioSource;
use crate::error::{BloodlaneError, Result};
use crate::params::{EnvelopeConfig, RenderConfig, SpawnConfig};

/// Where to take audio from
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Default capture device
    Input,
    /// Built-in pulse composition (plays through the speakers)
    Synth,
    /// WAV file given with --file
    File,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Bloodlane")]
#[command(about = "Keycap audio visualizer: loud moments spawn cells that drift across the lane", long_about = None)]
pub struct Args {
    /// Audio source
    #[arg(long, value_enum, default_value = "input")]
    pub source: SourceKind,

    /// WAV file for --source file
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Analyse a WAV file without opening a window and print the spawns
    #[arg(long, value_name = "PATH", conflicts_with_all = ["source", "file"])]
    pub analyze: Option<PathBuf>,

    /// Simulated frame rate for --analyze
    #[arg(long, value_name = "FPS", default_value = "60")]
    pub fps: f32,

    /// Envelope level that triggers a spawn
    #[arg(long, value_name = "LEVEL", default_value = "0.8")]
    pub threshold: f32,

    /// Minimum time between spawns
    #[arg(long, value_name = "SECONDS", default_value = "0.5")]
    pub interval: f32,

    /// Envelope release time
    #[arg(long, value_name = "MS", default_value = "34")]
    pub release_ms: f32,

    /// Length of the rolling sample window
    #[arg(long, value_name = "SECONDS", default_value = "5")]
    pub window_secs: f32,

    /// Window width (ignored with --fullscreen)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Window height (ignored with --fullscreen)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// Borderless fullscreen on the current monitor
    #[arg(long)]
    pub fullscreen: bool,

    /// Start with the envelope line hidden
    #[arg(long)]
    pub hide_envelope: bool,
}

impl Args {
    /// Resolve the audio source, requiring --file for the file source
    pub fn audio_source(&self) -> Result<AudioSource> {
        match (self.source, &self.file) {
            (SourceKind::Input, _) => Ok(AudioSource::Input),
            (SourceKind::Synth, _) => Ok(AudioSource::Synth),
            (SourceKind::File, Some(path)) => Ok(AudioSource::File(path.clone())),
            (SourceKind::File, None) => Err(BloodlaneError::InvalidConfig(
                "--source file needs --file <PATH>".to_string(),
            )),
        }
    }

    pub fn envelope_config(&self) -> Result<EnvelopeConfig> {
        let config = EnvelopeConfig {
            release_time_s: self.release_ms / 1000.0,
            window_secs: self.window_secs,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn spawn_config(&self) -> Result<SpawnConfig> {
        let config = SpawnConfig {
            threshold: self.threshold,
            interval_s: self.interval,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            fullscreen: self.fullscreen,
            show_envelope: !self.hide_envelope,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("bloodlane").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_match_params() {
        let args = parse(&[]);

        assert_eq!(args.audio_source().unwrap(), AudioSource::Input);
        let envelope = args.envelope_config().unwrap();
        assert!((envelope.release_time_s - 0.034).abs() < 1e-6);
        assert_eq!(envelope.max_samples(), EnvelopeConfig::default().max_samples());

        let spawn = args.spawn_config().unwrap();
        assert_eq!(spawn.threshold, 0.8);
        assert_eq!(spawn.interval_s, 0.5);
        assert!(args.render_config().show_envelope);
    }

    #[test]
    fn test_file_source_requires_path() {
        assert!(parse(&["--source", "file"]).audio_source().is_err());

        let args = parse(&["--source", "file", "--file", "hit.wav"]);
        assert_eq!(
            args.audio_source().unwrap(),
            AudioSource::File(PathBuf::from("hit.wav"))
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(parse(&["--threshold=-1"]).spawn_config().is_err());
        assert!(parse(&["--interval", "0.01"]).spawn_config().is_err());
        assert!(parse(&["--release-ms", "0"]).envelope_config().is_err());
        assert!(parse(&["--window-secs", "inf"]).envelope_config().is_err());
        assert!(parse(&["--threshold", "NaN"]).spawn_config().is_err());
    }

    #[test]
    fn test_analyze_conflicts_with_source() {
        let result = Args::try_parse_from(["bloodlane", "--analyze", "a.wav", "--source", "synth"]);
        assert!(result.is_err());
    }
}
