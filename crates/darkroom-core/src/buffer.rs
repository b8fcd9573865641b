//! Pixel buffer representation for the edit pipeline.

use crate::error::PipelineError;

/// Bytes per pixel. The pipeline only handles 8-bit RGB without alpha.
pub const CHANNELS: usize = 3;

/// Owned 8-bit RGB pixel data of a known shape.
///
/// The shape is validated on construction, so every `PixelBuffer` holds
/// exactly `width * height * 3` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGB bytes, checking them against `width × height`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PipelineError> {
        check_shape(data.len(), width, height)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Copy a borrowed slice into a new buffer. The source is never modified.
    pub fn from_slice(data: &[u8], width: u32, height: u32) -> Result<Self, PipelineError> {
        check_shape(data.len(), width, height)?;
        Ok(Self {
            width,
            height,
            data: data.to_vec(),
        })
    }

    /// A buffer with every pixel set to `rgb`.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw RGB bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// RGB triple at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Convert a decoded image into a pipeline buffer, dropping alpha.
    pub fn from_image(image: &image::DynamicImage) -> Self {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self {
            width,
            height,
            data: rgb.into_raw(),
        }
    }

    /// Convert into an `image` buffer for encoding.
    pub fn into_rgb_image(self) -> image::RgbImage {
        let Self {
            width,
            height,
            data,
        } = self;
        // The shape invariant guarantees the raw length matches.
        image::RgbImage::from_raw(width, height, data).unwrap_or_else(|| {
            image::RgbImage::new(width, height)
        })
    }
}

fn check_shape(len: usize, width: u32, height: u32) -> Result<(), PipelineError> {
    let expected = width as usize * height as usize * CHANNELS;
    if len != expected {
        return Err(PipelineError::InvalidBufferShape {
            width,
            height,
            expected,
            actual: len,
        });
    }
    Ok(())
}
