//! Source video inspection with ffprobe.
//!
//! Only the first video stream is queried, and only the fields the sampler
//! needs to size frame buffers and pick a stride. Dimensions are reported
//! as displayed: a stream rotated by 90 or 270 degrees has width and height
//! swapped.

use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Frame rate assumed when the container reports none.
const FALLBACK_FPS: f64 = 30.0;

/// Geometry and timing of a video's first video stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    /// Display width, after rotation
    pub width: u32,
    /// Display height, after rotation
    pub height: u32,
    /// Native frame rate
    pub fps: f64,
    /// Duration in seconds, 0.0 when unknown
    pub duration: f64,
    /// Frame count reported by the container, if any
    pub frame_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    streams: Vec<StreamEntry>,
    #[serde(default)]
    format: Option<FormatEntry>,
}

#[derive(Debug, Deserialize)]
struct StreamEntry {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
    nb_frames: Option<String>,
    #[serde(default)]
    tags: Option<StreamTags>,
    #[serde(default)]
    side_data_list: Vec<SideData>,
}

#[derive(Debug, Deserialize)]
struct StreamTags {
    rotate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SideData {
    rotation: Option<f64>,
}

impl StreamEntry {
    /// Rotation in degrees, display-matrix side data first, then the legacy tag.
    fn rotation(&self) -> f64 {
        self.side_data_list
            .iter()
            .find_map(|d| d.rotation)
            .or_else(|| {
                self.tags
                    .as_ref()
                    .and_then(|t| t.rotate.as_deref())
                    .and_then(|r| r.trim().parse().ok())
            })
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize)]
struct FormatEntry {
    duration: Option<String>,
}

/// Inspect the first video stream of `path`.
pub async fn probe_video(path: impl AsRef<Path>) -> MediaResult<VideoInfo> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args(["-v", "error", "-select_streams", "v:0", "-of", "json"])
        .args([
            "-show_entries",
            "stream=width,height,avg_frame_rate,r_frame_rate,duration,nb_frames\
             :stream_tags=rotate:stream_side_data=rotation:format=duration",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(MediaError::FfprobeFailed {
            message: format!("ffprobe exited with {}", output.status),
            stderr: (!stderr.is_empty()).then_some(stderr),
        });
    }

    let info = parse_report(&output.stdout)?;
    debug!(path = %path.display(), ?info, "Probed video");
    Ok(info)
}

fn parse_report(stdout: &[u8]) -> MediaResult<VideoInfo> {
    let report: ProbeReport = serde_json::from_slice(stdout)?;
    let stream = report
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| MediaError::InvalidVideo("no video stream".to_string()))?;

    let (mut width, mut height) = (stream.width.unwrap_or(0), stream.height.unwrap_or(0));
    let quarter_turns = (stream.rotation() / 90.0).round() as i64;
    if quarter_turns.rem_euclid(2) == 1 {
        std::mem::swap(&mut width, &mut height);
    }

    // avg_frame_rate is "0/0" for some streams
    let fps = [&stream.avg_frame_rate, &stream.r_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|rate| parse_rate(rate))
        .unwrap_or(FALLBACK_FPS);

    let duration = stream
        .duration
        .or(report.format.and_then(|f| f.duration))
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoInfo {
        width,
        height,
        fps,
        duration,
        frame_count: stream.nb_frames.and_then(|n| n.parse().ok()),
    })
}

/// Positive rate from `"num/den"` or a plain decimal.
fn parse_rate(rate: &str) -> Option<f64> {
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num.parse::<f64>().ok()? / den
        }
        None => rate.parse().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("60/1"), Some(60.0));
        assert!((parse_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert_eq!(parse_rate("25"), Some(25.0));
        assert_eq!(parse_rate("0/0"), None);
        assert_eq!(parse_rate("0"), None);
        assert_eq!(parse_rate("n/a"), None);
    }

    #[test]
    fn test_parse_report_prefers_stream_values() {
        let json = br#"{
            "streams": [{"width": 1920, "height": 1080, "avg_frame_rate": "0/0",
                         "r_frame_rate": "60/1", "duration": "4.200000", "nb_frames": "252"}],
            "format": {"duration": "4.250000"}
        }"#;

        let info = parse_report(json).unwrap();
        assert_eq!((info.width, info.height), (1920, 1080));
        assert_eq!(info.fps, 60.0);
        assert!((info.duration - 4.2).abs() < 1e-9);
        assert_eq!(info.frame_count, Some(252));
    }

    #[test]
    fn test_parse_report_falls_back() {
        let json = br#"{"streams": [{"width": 640, "height": 360}], "format": {"duration": "2.5"}}"#;
        let info = parse_report(json).unwrap();
        assert_eq!(info.fps, FALLBACK_FPS);
        assert_eq!(info.duration, 2.5);
        assert_eq!(info.frame_count, None);
    }

    #[test]
    fn test_parse_report_swaps_rotated_dimensions() {
        let json = br#"{
            "streams": [{"width": 1920, "height": 1080, "r_frame_rate": "30/1",
                         "side_data_list": [{"side_data_type": "Display Matrix", "rotation": -90}]}]
        }"#;
        let info = parse_report(json).unwrap();
        assert_eq!((info.width, info.height), (1080, 1920));

        let legacy = br#"{"streams": [{"width": 1920, "height": 1080, "tags": {"rotate": "270"}}]}"#;
        let info = parse_report(legacy).unwrap();
        assert_eq!((info.width, info.height), (1080, 1920));

        let upside_down = br#"{"streams": [{"width": 1920, "height": 1080, "tags": {"rotate": "180"}}]}"#;
        let info = parse_report(upside_down).unwrap();
        assert_eq!((info.width, info.height), (1920, 1080));
    }

    #[test]
    fn test_parse_report_without_video() {
        let err = parse_report(br#"{"streams": []}"#).unwrap_err();
        assert!(matches!(err, MediaError::InvalidVideo(_)));
        assert!(err.is_decode_error());
    }

    #[tokio::test]
    async fn test_probe_missing_file() {
        let err = probe_video("/definitely/not/here.mp4").await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
        assert!(err.is_decode_error());
    }
}
