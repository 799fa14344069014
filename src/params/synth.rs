//! Live synthesis and render parameters mutated from the keyboard.

use std::num::NonZeroU32;

/// Exclusive upper bound for randomized bias values
pub const BIAS_LIMIT: u8 = 20;

/// Oscillator and noise parameters read once per audio block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    /// Noise divisor; higher values give a finer noise floor.
    /// Non-zero by type, so the noise scale never divides by zero.
    pub clarity_level: NonZeroU32,

    /// Noise range multiplier (1..=4)
    pub noise_amplitude_steps: u32,

    /// Sawtooth level relative to the noise (dimensionless, ≥ 0)
    pub tone: f32,

    /// Sawtooth frequency (Hz)
    pub tone_frequency_hz: f32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            clarity_level: NonZeroU32::new(255).unwrap_or(NonZeroU32::MIN),
            noise_amplitude_steps: 2,
            tone: 1.0,
            tone_frequency_hz: 261.63, // Middle C
        }
    }
}

impl SynthParams {
    /// Replace the clarity level, storing 0 as 1
    pub fn set_clarity_level(&mut self, level: u32) {
        self.clarity_level = NonZeroU32::new(level).unwrap_or(NonZeroU32::MIN);
    }
}

/// Per-channel (min, max) pair narrowing a color channel's random range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelBias {
    /// Floor added to every generated value
    pub min: u8,

    /// Amount trimmed from the top of the range
    pub max: u8,
}

impl ChannelBias {
    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// Width of the random range; at least 1 even when `min + max` exceeds 256
    pub fn span(&self) -> u32 {
        (256 - i32::from(self.min) - i32::from(self.max)).max(1) as u32
    }
}

/// Bias pairs for all three color channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelBiases {
    pub red: ChannelBias,
    pub green: ChannelBias,
    pub blue: ChannelBias,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = SynthParams::default();
        assert_eq!(params.clarity_level.get(), 255);
        assert_eq!(params.noise_amplitude_steps, 2);
        assert_eq!(params.tone, 1.0);
        assert!((params.tone_frequency_hz - 261.63).abs() < 1e-3);
        assert_eq!(ChannelBiases::default().red, ChannelBias::new(0, 0));
    }

    #[test]
    fn test_zero_clarity_is_stored_as_one() {
        let mut params = SynthParams::default();
        params.set_clarity_level(0);
        assert_eq!(params.clarity_level.get(), 1);

        params.set_clarity_level(999);
        assert_eq!(params.clarity_level.get(), 999);
    }

    #[test]
    fn test_span() {
        assert_eq!(ChannelBias::new(0, 0).span(), 256);
        assert_eq!(ChannelBias::new(10, 19).span(), 227);
        // Sum past the channel range clamps to a single value
        assert_eq!(ChannelBias::new(200, 100).span(), 1);
        assert_eq!(ChannelBias::new(128, 128).span(), 1);
    }
}
