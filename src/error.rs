//! Error type shared by the audio, file and rendering layers.

use thiserror::Error;

/// Errors surfaced while setting up audio sources or the renderer.
///
/// The envelope/spawn core itself never fails; everything here comes from
/// devices, files or the GPU.
#[derive(Error, Debug)]
pub enum BloodlaneError {
    #[error("no audio input device found")]
    NoInputDevice,

    #[error("no audio output device found")]
    NoOutputDevice,

    #[error("failed to query default stream config: {0}")]
    StreamConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported sample format: {0}")]
    UnsupportedSampleFormat(cpal::SampleFormat),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("failed to spawn thread: {0}")]
    Thread(std::io::Error),

    #[error("synth engine failed: {0}")]
    Synth(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("gpu setup failed: {0}")]
    Gpu(String),
}

pub type Result<T> = std::result::Result<T, BloodlaneError>;
