//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (Hz, samples, pixels, seconds)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod render;
mod synth;

// Re-export all types
pub use audio::{audio_constants, AudioConfig};
pub use render::{RecordingConfig, RenderConfig};
pub use synth::{ChannelBias, ChannelBiases, SynthParams, BIAS_LIMIT};
