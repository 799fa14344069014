//! Audio stream configuration and constants.

/// Playback stream configuration requested from the output device
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Output channel count (mono)
    pub channels: u16,

    /// Requested device buffer size (frames per callback)
    /// 2048 frames = 46ms @ 44.1kHz
    pub block_size: u32,

    /// Peak scale applied to the mixed signal before conversion to i16.
    /// No clamping is applied afterwards; loud parameter combinations wrap.
    pub amplitude: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: audio_constants::SAMPLE_RATE_HZ,
            channels: 1,
            block_size: audio_constants::BLOCK_SIZE,
            amplitude: audio_constants::AMPLITUDE,
        }
    }
}

impl AudioConfig {
    /// Validate configuration (non-zero rate and block size, mono output)
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if self.block_size == 0 {
            return Err("Block size must be > 0".to_string());
        }
        if self.channels != 1 {
            return Err(format!(
                "Only mono output is supported, got {} channels",
                self.channels
            ));
        }
        Ok(())
    }

    /// Duration of one requested block (seconds)
    pub fn block_duration_s(&self) -> f32 {
        self.block_size as f32 / self.sample_rate_hz as f32
    }
}

/// Audio constants (compile-time defaults for the playback stream)
pub mod audio_constants {
    /// Sample rate (Hz)
    pub const SAMPLE_RATE_HZ: u32 = 44_100;

    /// Audio block size (samples per buffer)
    pub const BLOCK_SIZE: u32 = 2048;

    /// Output amplitude ceiling for a unit-level signal
    pub const AMPLITUDE: f32 = 28_000.0;
}
