//! Audio synthesis and playback.
//!
//! A tuned sawtooth mixed with stepped white noise, rendered block by block
//! inside the device callback from the latest parameter snapshot.

pub mod synthesis;
mod system;

// Re-export public types
pub use synthesis::SynthEngine;
pub use system::{create_wav_recorder, AudioSystem, WavRecorder};
