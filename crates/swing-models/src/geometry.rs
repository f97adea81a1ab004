use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in pixel coordinates, top-left origin (x, y, width, height).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    /// X coordinate of the top-left corner
    pub x: f64,
    /// Y coordinate of the top-left corner
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from corner coordinates (xmin, ymin, xmax, ymax).
    pub fn from_corners(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self::new(xmin, ymin, xmax - xmin, ymax - ymin)
    }

    /// A box spanning an entire frame.
    pub fn whole_frame(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    /// Center point (cx, cy).
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The box as `[x, y, width, height]`.
    pub fn to_xywh(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

/// A person candidate proposed by the detection oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersonDetection {
    pub bbox: BoundingBox,
    /// Detector confidence [0, 1]
    pub confidence: f64,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners() {
        let b = BoundingBox::from_corners(10.0, 20.0, 30.0, 60.0);
        assert_eq!(b.to_xywh(), [10.0, 20.0, 20.0, 40.0]);
        assert_eq!(b.center(), (20.0, 40.0));
        assert_eq!(b.area(), 800.0);
    }

    #[test]
    fn test_whole_frame() {
        let b = BoundingBox::whole_frame(640, 480);
        assert_eq!(b.to_xywh(), [0.0, 0.0, 640.0, 480.0]);
    }
}
