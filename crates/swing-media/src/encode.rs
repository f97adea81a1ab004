//! JPEG and base64 encoding for transport to the inference services.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, RgbImage};
use swing_models::{EncodedImage, Frame};

use crate::error::{MediaError, MediaResult};

/// JPEG quality used for every encoded frame.
pub const JPEG_QUALITY: u8 = 90;

/// Encode a sampled frame as JPEG.
pub fn encode_frame(frame: &Frame) -> MediaResult<EncodedImage> {
    encode_raw(frame.pixels(), frame.width(), frame.height())
}

/// Encode an RGB image buffer as JPEG.
pub fn encode_rgb(image: &RgbImage) -> MediaResult<EncodedImage> {
    encode_raw(image.as_raw(), image.width(), image.height())
}

fn encode_raw(pixels: &[u8], width: u32, height: u32) -> MediaResult<EncodedImage> {
    let mut bytes = Vec::with_capacity(pixels.len() / 8);
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
        .encode(pixels, width, height, ColorType::Rgb8)
        .map_err(|e| MediaError::encode(e.to_string()))?;
    Ok(EncodedImage::jpeg(width, height, bytes))
}

/// Standard base64 of the encoded bytes, as the inference API expects.
pub fn to_base64(image: &EncodedImage) -> String {
    STANDARD.encode(&image.bytes)
}
