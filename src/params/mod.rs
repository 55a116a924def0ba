//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (seconds, Hz, pixels)
//! - Documented ranges and meanings
//! - Validation where a bad value would break the pipeline

mod audio;
mod render;
mod spawn;

// Re-export all types
pub use audio::{audio_constants, EnvelopeConfig, MAX_WINDOW_SECS};
pub use render::{palette, RenderConfig};
pub use spawn::SpawnConfig;
