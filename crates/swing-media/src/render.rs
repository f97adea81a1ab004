//! Skeleton overlay rendering.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use swing_models::{EncodedImage, Frame, PoseResult};

use crate::encode::encode_rgb;
use crate::error::{MediaError, MediaResult};
use crate::skeleton::{
    KEYPOINT_COLOR, KEYPOINT_EDGES, KEYPOINT_RADIUS, KEYPOINT_THRESHOLD, LINE_THICKNESS,
    LINK_COLORS,
};

/// Draws a pose onto a frame, producing the image fed to the phase classifier.
pub trait FrameRenderer: Send + Sync {
    fn render(&self, frame: &Frame, pose: &PoseResult) -> MediaResult<EncodedImage>;
}

/// Renders confident keypoints as filled dots and joins them with coloured links.
#[derive(Debug, Clone)]
pub struct SkeletonRenderer {
    threshold: f64,
    radius: i32,
    thickness: i32,
}

impl Default for SkeletonRenderer {
    fn default() -> Self {
        Self {
            threshold: KEYPOINT_THRESHOLD,
            radius: KEYPOINT_RADIUS,
            thickness: LINE_THICKNESS,
        }
    }
}

impl SkeletonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw onto a copy of the frame without encoding.
    pub fn draw(&self, frame: &Frame, pose: &PoseResult) -> MediaResult<RgbImage> {
        let mut canvas =
            RgbImage::from_raw(frame.width(), frame.height(), frame.pixels().to_vec())
                .ok_or_else(|| MediaError::internal("frame buffer does not match dimensions"))?;

        self.draw_points(&mut canvas, pose);
        self.draw_links(&mut canvas, pose);

        Ok(canvas)
    }

    fn draw_points(&self, canvas: &mut RgbImage, pose: &PoseResult) {
        for (kp, score) in pose.keypoints.iter().zip(&pose.scores) {
            if *score > self.threshold {
                draw_filled_circle_mut(
                    canvas,
                    (kp.x as i32, kp.y as i32),
                    self.radius,
                    Rgb(KEYPOINT_COLOR),
                );
            }
        }
    }

    fn draw_links(&self, canvas: &mut RgbImage, pose: &PoseResult) {
        let (width, height) = (canvas.width() as i32, canvas.height() as i32);
        let inside = |x: i32, y: i32| x > 0 && x < width && y > 0 && y < height;

        for (&(a, b), color) in KEYPOINT_EDGES.iter().zip(LINK_COLORS) {
            let (Some(p1), Some(p2)) = (pose.keypoints.get(a), pose.keypoints.get(b)) else {
                continue;
            };
            let (x1, y1) = (p1.x as i32, p1.y as i32);
            let (x2, y2) = (p2.x as i32, p2.y as i32);

            if inside(x1, y1)
                && inside(x2, y2)
                && pose.score(a) > self.threshold
                && pose.score(b) > self.threshold
            {
                draw_thick_line(canvas, (x1, y1), (x2, y2), self.thickness, color);
            }
        }
    }
}

impl FrameRenderer for SkeletonRenderer {
    fn render(&self, frame: &Frame, pose: &PoseResult) -> MediaResult<EncodedImage> {
        let canvas = self.draw(frame, pose)?;
        encode_rgb(&canvas)
    }
}

/// Line with a square brush `thickness` pixels wide, as offset one-pixel segments.
fn draw_thick_line(
    canvas: &mut RgbImage,
    (x0, y0): (i32, i32),
    (x1, y1): (i32, i32),
    thickness: i32,
    color: [u8; 3],
) {
    let lo = -(thickness - 1) / 2;
    let hi = thickness / 2;
    for oy in lo..=hi {
        for ox in lo..=hi {
            draw_line_segment_mut(
                canvas,
                ((x0 + ox) as f32, (y0 + oy) as f32),
                ((x1 + ox) as f32, (y1 + oy) as f32),
                Rgb(color),
            );
        }
    }
}
