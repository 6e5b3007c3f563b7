//! Channel-first pixel tensors.

use image::{ColorType, DynamicImage};

/// An 8-bit image laid out channel-first (`C x H x W`).
///
/// This is the layout most training loops expect, with one contiguous plane
/// per channel instead of interleaved pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileTensor {
    channels: usize,
    height: usize,
    width: usize,
    data: Vec<u8>,
}

impl TileTensor {
    /// Convert a decoded image into a channel-first tensor.
    ///
    /// 8-bit gray, gray+alpha, RGB and RGBA images keep their channels.
    /// Any other layout (16-bit, float) is converted to 8-bit RGB first.
    pub fn from_image(image: &DynamicImage) -> Self {
        let width = image.width() as usize;
        let height = image.height() as usize;

        let (channels, interleaved) = match image.color() {
            ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => (
                image.color().channel_count() as usize,
                image.as_bytes().to_vec(),
            ),
            _ => (3, image.to_rgb8().into_raw()),
        };

        let plane = width * height;
        let mut data = vec![0u8; interleaved.len()];
        for (i, pixel) in interleaved.chunks_exact(channels).enumerate() {
            for (c, value) in pixel.iter().enumerate() {
                data[c * plane + i] = *value;
            }
        }

        Self {
            channels,
            height,
            width,
            data,
        }
    }

    /// Shape as `[channels, height, width]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.channels, self.height, self.width]
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Raw channel-first buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Value of channel `c` at `(x, y)`, or `None` out of bounds.
    pub fn get(&self, c: usize, y: usize, x: usize) -> Option<u8> {
        if c >= self.channels || y >= self.height || x >= self.width {
            return None;
        }
        Some(self.data[c * self.height * self.width + y * self.width + x])
    }

    /// Buffer scaled to `[0.0, 1.0]`, same layout.
    pub fn to_f32_normalized(&self) -> Vec<f32> {
        self.data.iter().map(|&v| f32::from(v) / 255.0).collect()
    }
}
