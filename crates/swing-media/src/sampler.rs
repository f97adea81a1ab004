//! Fixed-rate frame sampling.
//!
//! FFmpeg decodes the source to packed RGB24 on stdout with passthrough
//! timing, so every decoded frame arrives exactly once. The sampler keeps
//! every `stride`-th frame and numbers kept frames from zero.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use swing_models::{Frame, SourceVideo};
use tokio::io::{AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};
use crate::probe::probe_video;

/// Frames sampled from one video.
#[derive(Debug, Clone)]
pub struct SampledVideo {
    pub source: SourceVideo,
    /// Kept frames, indices contiguous from 0
    pub frames: Vec<Frame>,
}

/// Source of sampled frames for a video path.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Decode `video_path`, keeping roughly `target_fps` frames per second.
    ///
    /// Returns an empty frame list (not an error) for a video with no frames.
    async fn sample(&self, video_path: &Path, target_fps: f64) -> MediaResult<SampledVideo>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Number of decoded frames between kept frames: `floor(native / target)`, at least 1.
pub fn sampling_stride(native_fps: f64, target_fps: f64) -> usize {
    if !(target_fps > 0.0) || !native_fps.is_finite() {
        return 1;
    }
    let stride = (native_fps / target_fps).floor();
    if stride < 1.0 {
        1
    } else {
        stride as usize
    }
}

/// FFmpeg rgb24 decode of every frame at the probed display size.
///
/// The process is killed when the returned child is dropped.
fn decode_command(video_path: &Path, width: u32, height: u32) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-hide_banner", "-loglevel", "error", "-i"])
        .arg(video_path)
        .args([
            "-vf",
            &format!("scale={width}:{height}"),
            "-fps_mode",
            "passthrough",
            "-pix_fmt",
            "rgb24",
            "-f",
            "rawvideo",
            "-",
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

/// FFmpeg-backed [`FrameSource`].
#[derive(Debug, Default, Clone)]
pub struct FfmpegFrameSampler;

impl FfmpegFrameSampler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FrameSource for FfmpegFrameSampler {
    async fn sample(&self, video_path: &Path, target_fps: f64) -> MediaResult<SampledVideo> {
        let info = probe_video(video_path).await.map_err(|e| match e {
            MediaError::FfprobeNotFound => e,
            other => MediaError::decode_failed(video_path, other.to_string()),
        })?;

        if info.width == 0 || info.height == 0 {
            return Err(MediaError::decode_failed(
                video_path,
                "video stream has no dimensions",
            ));
        }

        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let stride = sampling_stride(info.fps, target_fps);
        let frame_len = Frame::byte_len(info.width, info.height);

        debug!(
            path = %video_path.display(),
            native_fps = info.fps,
            target_fps,
            stride,
            "Decoding video frames"
        );

        let mut child = decode_command(video_path, info.width, info.height).spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MediaError::internal("Failed to capture FFmpeg stdout"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MediaError::internal("Failed to capture FFmpeg stderr"))?;

        let stderr_handle = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        });

        let mut reader = BufReader::new(stdout);
        let mut buffer = vec![0u8; frame_len];
        let mut frames = Vec::new();
        let mut decoded = 0usize;

        loop {
            match reader.read_exact(&mut buffer).await {
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }

            if decoded % stride == 0 {
                let frame = Frame::from_rgb(frames.len(), info.width, info.height, buffer.clone())
                    .map_err(|e| MediaError::internal(e.to_string()))?;
                frames.push(frame);
            }
            decoded += 1;
        }

        let status = child.wait().await?;
        let stderr_text = stderr_handle.await.unwrap_or_default();

        if !status.success() {
            if decoded == 0 {
                return Err(MediaError::decode_failed(video_path, stderr_text.trim()));
            }
            warn!(
                code = ?status.code(),
                decoded,
                "FFmpeg exited with error after decoding frames: {}",
                stderr_text.trim()
            );
        }

        info!(
            decoded,
            kept = frames.len(),
            stride,
            "Sampled frames from {}",
            video_path.display()
        );

        Ok(SampledVideo {
            source: SourceVideo {
                width: info.width,
                height: info.height,
                fps: info.fps,
                duration: info.duration,
                stride,
            },
            frames,
        })
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}
