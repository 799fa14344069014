//! Tuned sawtooth blended with amplitude-stepped uniform noise.
//!
//! Realtime constraints:
//! - No allocations or locks inside `fill_block`.
//! - Constant work per sample.

use rand::Rng;

use crate::params::{AudioConfig, SynthParams};

/// Sawtooth phase in `[0, 1)` for sample `index` of the current block.
///
/// The ramp restarts at every block boundary: phase is derived from the
/// in-block index, not from the running sample clock. A non-positive or
/// non-finite frequency holds the ramp at 0.
#[inline]
pub fn saw_phase(index: usize, sample_rate_hz: f32, tone_frequency_hz: f32) -> f32 {
    if !(tone_frequency_hz > 0.0 && tone_frequency_hz.is_finite()) {
        return 0.0;
    }
    let period = sample_rate_hz / tone_frequency_hz;
    let ramp = index as f32 / period;
    ramp - ramp.floor()
}

/// Exclusive upper bound of the integer noise draw, at least 1
#[inline]
pub fn noise_bound(params: &SynthParams) -> u32 {
    let half_clarity = params.clarity_level.get() / 2;
    half_clarity
        .saturating_mul(params.noise_amplitude_steps)
        .max(1)
}

/// Noise term in `[0, noise_bound / clarity)`
#[inline]
pub fn noise_level<R: Rng + ?Sized>(params: &SynthParams, rng: &mut R) -> f32 {
    let draw = rng.gen_range(0..noise_bound(params));
    draw as f32 / params.clarity_level.get() as f32
}

/// Scale a mixed level to a signed 16-bit sample.
///
/// Rounds, then keeps the low 16 bits: levels past the i16 range wrap around
/// rather than clip.
#[inline]
pub fn to_sample(level: f32, amplitude: f32) -> i16 {
    (amplitude * level).round() as i32 as i16
}

/// Audio synthesis engine owned by the playback callback
#[derive(Debug)]
pub struct SynthEngine {
    sample_rate_hz: f32,
    amplitude: f32,
    /// Samples emitted since the stream started (wraps)
    sample_clock: u64,
}

impl SynthEngine {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            sample_rate_hz: config.sample_rate_hz as f32,
            amplitude: config.amplitude,
            sample_clock: 0,
        }
    }

    /// Fill the whole of `block` using one parameter snapshot
    pub fn fill_block<R: Rng + ?Sized>(
        &mut self,
        params: &SynthParams,
        rng: &mut R,
        block: &mut [i16],
    ) {
        for (i, sample) in block.iter_mut().enumerate() {
            let saw = saw_phase(i, self.sample_rate_hz, params.tone_frequency_hz);
            let noise = noise_level(params, rng);
            *sample = to_sample(noise + saw * params.tone, self.amplitude);
        }
        self.sample_clock = self.sample_clock.wrapping_add(block.len() as u64);
    }

    /// Samples emitted since the stream started
    pub fn sample_clock(&self) -> u64 {
        self.sample_clock
    }
}
