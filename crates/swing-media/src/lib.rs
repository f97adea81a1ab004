//! FFmpeg frame sampling and skeleton rendering.
//!
//! This crate provides:
//! - FFprobe video inspection
//! - Fixed-rate frame sampling via FFmpeg rawvideo decoding
//! - JPEG/base64 encoding of frames
//! - Skeleton overlay rendering of pose results

pub mod encode;
pub mod error;
pub mod probe;
pub mod render;
pub mod sampler;
pub mod skeleton;

pub use encode::{encode_frame, encode_rgb, to_base64};
pub use error::{MediaError, MediaResult};
pub use probe::{probe_video, VideoInfo};
pub use render::{FrameRenderer, SkeletonRenderer};
pub use sampler::{sampling_stride, FfmpegFrameSampler, FrameSource, SampledVideo};
