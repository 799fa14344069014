//! Fixed-size ARGB frame buffer reused in place across frames.

use image::RgbaImage;

/// Packed 32-bit ARGB pixels, row-major
pub struct FrameBuffer {
    pub pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    /// Allocate an opaque black frame; the only allocation the buffer ever makes
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0xFF00_0000; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Mutable rows of `width` pixels each
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u32> {
        self.pixels.chunks_exact_mut(self.width as usize)
    }

    /// Raw bytes for texture upload.
    ///
    /// On little-endian targets a packed ARGB word lays out as B, G, R, A,
    /// matching `Bgra8Unorm`.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Bytes per row of the upload
    pub fn bytes_per_row(&self) -> u32 {
        self.width * std::mem::size_of::<u32>() as u32
    }

    /// Convert to an RGBA image (recording mode only)
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let [a, r, g, b] = self.pixel(x, y).to_be_bytes();
            image::Rgba([r, g, b, a])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_dimensions() {
        let mut frame = FrameBuffer::new(640, 480);
        assert_eq!(frame.pixels.len(), 640 * 480);
        assert_eq!(frame.as_bytes().len(), 640 * 480 * 4);
        assert_eq!(frame.bytes_per_row(), 2560);
        assert_eq!(frame.rows_mut().count(), 480);
    }

    #[test]
    fn test_rgba_conversion() {
        let mut frame = FrameBuffer::new(2, 1);
        frame.pixels[1] = 0xFF11_2233;

        let image = frame.to_rgba_image();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [0x11, 0x22, 0x33, 0xFF]);
    }
}
