//! Full-screen colored noise generated on the CPU, one frame per iteration.

mod frame;
mod noise;

// Re-export public types
pub use frame::FrameBuffer;
pub use noise::{channel_value, pack_argb, PixelNoiseEngine};
