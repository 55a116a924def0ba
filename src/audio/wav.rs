//! WAV file source: decode to mono and stream into the sample window.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::buffer::SampleBuffer;
use crate::error::{BloodlaneError, Result};
use crate::params::audio_constants::FILE_CHUNK_SIZES;

/// Decoded mono audio
#[derive(Debug, Clone)]
pub struct WavClip {
    pub samples: Vec<f32>,
    pub sample_rate_hz: u32,
}

impl WavClip {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate_hz as f32
    }
}

/// Read a WAV file, converting integer PCM to [-1, 1] floats and averaging
/// channels down to mono
pub fn read_mono(path: impl AsRef<Path>) -> Result<WavClip> {
    let mut reader = hound::WavReader::open(path.as_ref())?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let samples = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    log::info!(
        "Loaded {} ({} Hz, {} channel(s), {} bits)",
        path.as_ref().display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample
    );

    Ok(WavClip {
        samples,
        sample_rate_hz: spec.sample_rate,
    })
}

/// Background thread pushing a clip into a [`SampleBuffer`] at real-time
/// pace, looping until dropped
pub struct FileFeeder {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FileFeeder {
    pub fn spawn(clip: WavClip, buffer: SampleBuffer) -> Result<Self> {
        if clip.samples.is_empty() {
            return Err(BloodlaneError::InvalidConfig(
                "wav file contains no samples".to_string(),
            ));
        }

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("wav-feeder".to_string())
            .spawn(move || feed_loop(&clip, &buffer, &stop_flag))
            .map_err(BloodlaneError::Thread)?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }
}

impl Drop for FileFeeder {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn feed_loop(clip: &WavClip, buffer: &SampleBuffer, stop: &AtomicBool) {
    let mut position = 0;
    let mut chunk_sizes = FILE_CHUNK_SIZES.iter().cycle();

    while !stop.load(Ordering::Acquire) {
        let chunk = *chunk_sizes.next().unwrap_or(&FILE_CHUNK_SIZES[0]);
        let end = (position + chunk).min(clip.samples.len());
        buffer.push(&clip.samples[position..end]);

        let pushed = end - position;
        position = if end == clip.samples.len() { 0 } else { end };

        thread::sleep(Duration::from_secs_f64(
            pushed as f64 / clip.sample_rate_hz as f64,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, spec: hound::WavSpec, frames: &[[i16; 2]]) {
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for frame in frames {
            writer.write_sample(frame[0]).unwrap();
            writer.write_sample(frame[1]).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_read_mono_downmixes_and_scales_int_pcm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        write_wav(&path, spec, &[[16384, 16384], [16384, -16384], [0, 0]]);

        let clip = read_mono(&path).unwrap();

        assert_eq!(clip.sample_rate_hz, 22050);
        assert_eq!(clip.samples.len(), 3);
        assert!((clip.samples[0] - 0.5).abs() < 1e-6);
        assert!(clip.samples[1].abs() < 1e-6);
    }

    #[test]
    fn test_read_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_mono(dir.path().join("missing.wav"));

        assert!(matches!(result, Err(BloodlaneError::Wav(_))));
    }

    #[test]
    fn test_feeder_rejects_empty_clip() {
        let clip = WavClip {
            samples: Vec::new(),
            sample_rate_hz: 44100,
        };
        assert!(FileFeeder::spawn(clip, SampleBuffer::new(16)).is_err());
    }

    #[test]
    fn test_feeder_fills_buffer() {
        let clip = WavClip {
            samples: vec![0.5; 4096],
            sample_rate_hz: 44100,
        };
        let buffer = SampleBuffer::new(1024);
        let feeder = FileFeeder::spawn(clip, buffer.clone()).unwrap();

        // First chunk is pushed before the feeder ever sleeps
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while buffer.is_empty() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        drop(feeder);

        assert!(!buffer.is_empty());
        assert!(buffer.len() <= buffer.capacity());
    }
}
