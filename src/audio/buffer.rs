//! Rolling sample window shared between the audio callback and the frame loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Whether the producer is currently allowed to append samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Recording,
    Idle,
}

#[derive(Debug)]
struct Shared {
    samples: Mutex<Vec<f32>>,
    recording: AtomicBool,
    capacity: usize,
}

/// Bounded, thread-safe sample window.
///
/// Cloning is cheap and yields another handle to the same window, so one
/// clone can move into the audio callback while the frame loop keeps the
/// other.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    shared: Arc<Shared>,
}

impl SampleBuffer {
    /// Create an empty window holding at most `capacity` samples, recording
    pub fn new(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                samples: Mutex::new(Vec::with_capacity(capacity)),
                recording: AtomicBool::new(true),
                capacity,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Append a block of samples, dropping the oldest ones past capacity.
    ///
    /// Does nothing while idle. Block size may vary between calls.
    pub fn push(&self, block: &[f32]) {
        if !self.shared.recording.load(Ordering::Acquire) {
            return;
        }
        let mut samples = self.lock();
        samples.extend_from_slice(block);
        trim_front(&mut samples, self.shared.capacity);
    }

    /// Append samples produced by an iterator (used for channel downmixing)
    pub fn push_iter(&self, block: impl IntoIterator<Item = f32>) {
        if !self.shared.recording.load(Ordering::Acquire) {
            return;
        }
        let mut samples = self.lock();
        samples.extend(block);
        trim_front(&mut samples, self.shared.capacity);
    }

    /// Copy the current window out under the lock
    pub fn snapshot(&self) -> Vec<f32> {
        self.lock().clone()
    }

    /// Copy the current window into `out`, reusing its allocation
    pub fn snapshot_into(&self, out: &mut Vec<f32>) {
        let samples = self.lock();
        out.clear();
        out.extend_from_slice(&samples);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn recording_state(&self) -> RecordingState {
        if self.shared.recording.load(Ordering::Acquire) {
            RecordingState::Recording
        } else {
            RecordingState::Idle
        }
    }

    /// Move to `state`. Entering `Recording` from `Idle` clears the window so
    /// stale audio never replays.
    pub fn set_recording_state(&self, state: RecordingState) {
        match state {
            RecordingState::Recording => {
                // Clear before re-enabling so the producer can't slip samples
                // in between.
                let mut samples = self.lock();
                let was_recording = self.shared.recording.swap(true, Ordering::AcqRel);
                if !was_recording {
                    samples.clear();
                }
            }
            RecordingState::Idle => {
                self.shared.recording.store(false, Ordering::Release);
            }
        }
    }

    /// Flip between `Recording` and `Idle`, returning the new state
    pub fn toggle_recording(&self) -> RecordingState {
        let next = match self.recording_state() {
            RecordingState::Recording => RecordingState::Idle,
            RecordingState::Idle => RecordingState::Recording,
        };
        self.set_recording_state(next);
        next
    }

    fn lock(&self) -> MutexGuard<'_, Vec<f32>> {
        // A panic while holding the lock leaves plain f32 data behind, which
        // is still usable.
        self.shared
            .samples
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn trim_front(samples: &mut Vec<f32>, capacity: usize) {
    if samples.len() > capacity {
        let excess = samples.len() - capacity;
        samples.drain(..excess);
    }
}
