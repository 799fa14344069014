//! Per-pixel uniform noise with per-channel bias.

use rand::Rng;

use super::FrameBuffer;
use crate::params::{ChannelBias, ChannelBiases};

/// Opaque alpha in a packed ARGB word
const ALPHA_OPAQUE: u32 = 0xFF00_0000;

/// Random value for one channel: `min + uniform(0, span)`.
///
/// `span` is clamped to at least 1, so a bias pair summing past the channel
/// range collapses to exactly `min` instead of an empty range.
#[inline]
pub fn channel_value<R: Rng + ?Sized>(bias: ChannelBias, rng: &mut R) -> u32 {
    u32::from(bias.min) + rng.gen_range(0..bias.span())
}

/// Pack 8-bit channels into an opaque ARGB word
#[inline]
pub fn pack_argb(red: u32, green: u32, blue: u32) -> u32 {
    ALPHA_OPAQUE | (red & 0xFF) << 16 | (green & 0xFF) << 8 | (blue & 0xFF)
}

/// Pixel noise engine rewriting the whole frame each iteration
#[derive(Debug, Default)]
pub struct PixelNoiseEngine {
    frames_rendered: u64,
}

impl PixelNoiseEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite every pixel of `frame` with fresh biased noise
    pub fn render<R: Rng + ?Sized>(
        &mut self,
        frame: &mut FrameBuffer,
        bias: &ChannelBiases,
        rng: &mut R,
    ) {
        for row in frame.rows_mut() {
            for pixel in row {
                let red = channel_value(bias.red, rng);
                let green = channel_value(bias.green, rng);
                let blue = channel_value(bias.blue, rng);
                *pixel = pack_argb(red, green, blue);
            }
        }
        self.frames_rendered = self.frames_rendered.wrapping_add(1);
    }

    /// Number of frames rendered so far
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn channels(pixel: u32) -> (u32, u32, u32, u32) {
        (pixel >> 24, (pixel >> 16) & 0xFF, (pixel >> 8) & 0xFF, pixel & 0xFF)
    }

    #[test]
    fn test_channels_stay_in_biased_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut frame = FrameBuffer::new(64, 48);
        let bias = ChannelBiases {
            red: ChannelBias::new(19, 0),
            green: ChannelBias::new(0, 19),
            blue: ChannelBias::new(12, 5),
        };

        PixelNoiseEngine::new().render(&mut frame, &bias, &mut rng);

        for &pixel in &frame.pixels {
            let (a, r, g, b) = channels(pixel);
            assert_eq!(a, 0xFF);
            assert!((19..19 + 237).contains(&r));
            assert!(g < 237);
            assert!((12..12 + 239).contains(&b));
        }
    }

    #[test]
    fn test_oversized_bias_collapses_to_min() {
        let mut rng = StdRng::seed_from_u64(1);
        let bias = ChannelBias::new(200, 100);

        for _ in 0..100 {
            assert_eq!(channel_value(bias, &mut rng), 200);
        }
    }

    #[test]
    fn test_every_pixel_overwritten() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut frame = FrameBuffer::new(32, 16);
        frame.pixels.fill(0);

        let mut engine = PixelNoiseEngine::new();
        engine.render(&mut frame, &ChannelBiases::default(), &mut rng);

        assert!(frame.pixels.iter().all(|&p| p >> 24 == 0xFF));
        assert_eq!(engine.frames_rendered(), 1);
    }

    #[test]
    fn test_same_seed_same_frame() {
        let bias = ChannelBiases {
            red: ChannelBias::new(4, 9),
            ..Default::default()
        };
        let mut first = FrameBuffer::new(40, 30);
        let mut second = FrameBuffer::new(40, 30);

        let mut engine = PixelNoiseEngine::new();
        engine.render(&mut first, &bias, &mut StdRng::seed_from_u64(99));
        engine.render(&mut second, &bias, &mut StdRng::seed_from_u64(99));

        assert_eq!(first.pixels, second.pixels);
    }

    #[test]
    fn test_pack_argb() {
        assert_eq!(pack_argb(0x12, 0x34, 0x56), 0xFF12_3456);
        assert_eq!(pack_argb(0, 0, 0), 0xFF00_0000);
    }
}
