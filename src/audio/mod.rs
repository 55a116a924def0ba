//! Audio capture, sample window and envelope analysis.
//!
//! Producers (capture callback, synth callback, file feeder) push into a
//! shared [`SampleBuffer`]; the frame loop snapshots it and runs the
//! [`EnvelopeFollower`] over the copy.

mod buffer;
mod envelope;
mod synthesis;
mod system;
pub mod wav;

// Re-export public types
pub use buffer::{RecordingState, SampleBuffer};
pub use envelope::{find_peak, EnvelopeFollower, Peak};
pub use system::{AudioSource, AudioSystem};
