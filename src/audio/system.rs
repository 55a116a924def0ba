//! Audio system: opens a source and feeds the shared sample window.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use glicol::Engine;
use std::path::{Path, PathBuf};

use super::buffer::SampleBuffer;
use super::synthesis::{GLICOL_COMPOSITION, MONITOR_GAIN};
use super::wav::{self, FileFeeder};
use crate::error::{BloodlaneError, Result};
use crate::params::{audio_constants::BLOCK_SIZE, EnvelopeConfig};

/// Where samples come from
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSource {
    /// Default capture device (microphone / line in)
    Input,
    /// Built-in glicol composition, played and analysed
    Synth,
    /// WAV file streamed at real-time pace, looping
    File(PathBuf),
}

/// Audio system owning the producer side of the sample window
pub struct AudioSystem {
    /// Shared sample window (producer writes, frame loop reads)
    buffer: SampleBuffer,

    /// Envelope configuration with the sample rate the source actually runs at
    config: EnvelopeConfig,

    /// Audio stream (kept alive)
    _stream: Option<cpal::Stream>,

    /// File feeder thread (stopped on drop)
    _feeder: Option<FileFeeder>,
}

impl AudioSystem {
    /// Open `source` and start pushing samples.
    ///
    /// `config.sample_rate_hz` is replaced by the rate of the device or file,
    /// and the window is sized from the result.
    pub fn start(source: &AudioSource, config: &EnvelopeConfig) -> Result<Self> {
        config.validate()?;

        match source {
            AudioSource::Input => Self::start_input(config),
            AudioSource::Synth => Self::start_synth(config),
            AudioSource::File(path) => Self::start_file(path, config),
        }
    }

    /// Handle to the shared sample window
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// Envelope configuration matching the running source
    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    fn start_input(base: &EnvelopeConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(BloodlaneError::NoInputDevice)?;

        let supported = device.default_input_config()?;
        let config = with_rate(base, supported.sample_rate().0);
        let buffer = SampleBuffer::new(config.max_samples());

        log::info!(
            "Audio input: {} @ {}Hz, {} channel(s), {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate_hz,
            supported.channels(),
            supported.sample_format()
        );

        let stream_config: cpal::StreamConfig = supported.config();
        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => {
                build_capture_stream::<f32>(&device, &stream_config, buffer.clone())?
            }
            cpal::SampleFormat::I16 => {
                build_capture_stream::<i16>(&device, &stream_config, buffer.clone())?
            }
            cpal::SampleFormat::U16 => {
                build_capture_stream::<u16>(&device, &stream_config, buffer.clone())?
            }
            other => return Err(BloodlaneError::UnsupportedSampleFormat(other)),
        };
        stream.play()?;

        Ok(Self {
            buffer,
            config,
            _stream: Some(stream),
            _feeder: None,
        })
    }

    fn start_synth(base: &EnvelopeConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(BloodlaneError::NoOutputDevice)?;

        let supported = device.default_output_config()?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(BloodlaneError::UnsupportedSampleFormat(
                supported.sample_format(),
            ));
        }
        let config = with_rate(base, supported.sample_rate().0);
        let buffer = SampleBuffer::new(config.max_samples());

        log::info!(
            "Audio synth: {} @ {}Hz",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate_hz
        );

        // Create Glicol engine
        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(config.sample_rate_hz as usize);
        engine.update_with_code(GLICOL_COMPOSITION);
        engine
            .update()
            .map_err(|e| BloodlaneError::Synth(format!("{:?}", e)))?;

        let stream_config: cpal::StreamConfig = supported.config();
        let channels = stream_config.channels.max(1) as usize;
        let producer = buffer.clone();

        let stream = device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let frames_needed = data.len() / channels;
                let mut frame_idx = 0;
                let mut block = [0.0f32; BLOCK_SIZE];

                // Generate multiple blocks if needed to fill the entire buffer
                while frame_idx < frames_needed {
                    let (buffers, _) = engine.next_block(vec![]);
                    let samples_to_copy = (frames_needed - frame_idx).min(BLOCK_SIZE);

                    for i in 0..samples_to_copy {
                        let left = buffers[0][i].clamp(-1.0, 1.0);
                        let right = buffers[1][i].clamp(-1.0, 1.0);
                        block[i] = left;

                        let frame = &mut data[(frame_idx + i) * channels..][..channels];
                        for (ch, out) in frame.iter_mut().enumerate() {
                            let sample = if ch % 2 == 0 { left } else { right };
                            *out = sample * MONITOR_GAIN;
                        }
                    }

                    producer.push(&block[..samples_to_copy]);
                    frame_idx += samples_to_copy;
                }
            },
            |err| log::error!("Audio output stream error: {}", err),
            None,
        )?;
        stream.play()?;

        Ok(Self {
            buffer,
            config,
            _stream: Some(stream),
            _feeder: None,
        })
    }

    fn start_file(path: &Path, base: &EnvelopeConfig) -> Result<Self> {
        let clip = wav::read_mono(path)?;
        let config = with_rate(base, clip.sample_rate_hz);
        let buffer = SampleBuffer::new(config.max_samples());

        log::info!(
            "Audio file: {} ({:.1}s, looping)",
            path.display(),
            clip.duration_secs()
        );

        let feeder = FileFeeder::spawn(clip, buffer.clone())?;

        Ok(Self {
            buffer,
            config,
            _stream: None,
            _feeder: Some(feeder),
        })
    }
}

fn with_rate(base: &EnvelopeConfig, sample_rate_hz: u32) -> EnvelopeConfig {
    if sample_rate_hz != base.sample_rate_hz {
        log::info!(
            "Using source rate {}Hz instead of configured {}Hz",
            sample_rate_hz,
            base.sample_rate_hz
        );
    }
    EnvelopeConfig {
        sample_rate_hz,
        ..base.clone()
    }
}

/// Build a capture stream that averages each frame's channels into one
/// sample and pushes the block into `buffer`
fn build_capture_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    buffer: SampleBuffer,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = config.channels.max(1) as usize;
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            buffer.push_iter(data.chunks(channels).map(|frame| {
                frame.iter().map(|&s| f32::from_sample(s)).sum::<f32>() / frame.len() as f32
            }));
        },
        |err| log::error!("Audio input stream error: {}", err),
        None,
    )?;
    Ok(stream)
}
