//! Decoded frames and encoded images.

use std::sync::Arc;

use thiserror::Error;

/// Errors constructing a frame from raw pixel data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("invalid pixel buffer: expected {expected} bytes, got {actual}")]
    PixelLength { expected: usize, actual: usize },

    #[error("frame has zero width or height")]
    EmptyDimensions,
}

/// A single decoded RGB24 raster plus its ordinal in the sampled sequence.
///
/// Frames are immutable once produced by the sampler. Pixel data is shared,
/// so cloning a frame is cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    index: usize,
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl Frame {
    /// Create a frame from tightly packed RGB24 bytes.
    pub fn from_rgb(
        index: usize,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::EmptyDimensions);
        }

        let expected = Self::byte_len(width, height);
        if pixels.len() != expected {
            return Err(FrameError::PixelLength {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            index,
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// Create a frame filled with a single colour.
    pub fn filled(index: usize, width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels: Vec<u8> = rgb
            .iter()
            .copied()
            .cycle()
            .take(Self::byte_len(width, height))
            .collect();

        Self {
            index,
            width,
            height,
            pixels: pixels.into(),
        }
    }

    /// Number of bytes an RGB24 frame of the given size occupies.
    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    /// Ordinal position in the sampled sequence (not the source frame number).
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB24 pixel bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// An image encoded for transport (JPEG).
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    /// MIME type of `bytes`
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Wrap JPEG bytes.
    pub fn jpeg(width: u32, height: u32, bytes: Vec<u8>) -> Self {
        Self {
            width,
            height,
            mime: "image/jpeg",
            bytes,
        }
    }
}
