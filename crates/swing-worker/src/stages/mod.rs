//! Pipeline stages, in run order.

mod classification;
mod feedback;
mod pose;
mod sampling;
mod segmentation;
mod validation;
mod visualization;

pub use classification::ClassificationStage;
pub use feedback::FeedbackStage;
pub use pose::PoseStage;
pub use sampling::SamplingStage;
pub use segmentation::SegmentationStage;
pub use validation::{ValidationStage, SWING_LABELS};
pub use visualization::VisualizationStage;
