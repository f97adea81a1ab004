//! End-to-end pipeline runs against in-memory frames and stub oracles.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use swing_media::{FrameSource, MediaResult, SampledVideo, SkeletonRenderer};
use swing_ml_client::{
    ClassificationOracle, DetectionOracle, GenerationOracle, GenerationParams, LabelScores,
    MlError, MlResult, PoseOracle,
};
use swing_models::{
    BoundingBox, EncodedImage, Frame, Keypoint, PersonDetection, PhaseDetection, PoseResult,
    SourceVideo, SwingPhase,
};
use swing_worker::feedback::{GENERATION_FAILED_FEEDBACK, NO_ANALYSIS_FEEDBACK};
use swing_worker::{Oracles, SwingPipeline, WorkerConfig, WorkerError};

const SIZE: u32 = 32;

struct MemorySource {
    frames: usize,
}

#[async_trait]
impl FrameSource for MemorySource {
    async fn sample(&self, _video_path: &Path, _target_fps: f64) -> MediaResult<SampledVideo> {
        Ok(SampledVideo {
            source: SourceVideo {
                width: SIZE,
                height: SIZE,
                fps: 30.0,
                duration: self.frames as f64,
                stride: 30,
            },
            frames: (0..self.frames)
                .map(|i| Frame::filled(i, SIZE, SIZE, [40, 90, 40]))
                .collect(),
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[derive(Default)]
struct Detector {
    calls: AtomicUsize,
    stall: Option<Duration>,
    people: Vec<PersonDetection>,
}

#[async_trait]
impl DetectionOracle for Detector {
    async fn detect(&self, _image: &EncodedImage) -> MlResult<Vec<PersonDetection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(stall) = self.stall {
            tokio::time::sleep(stall).await;
        }
        Ok(self.people.clone())
    }
}

fn person(x: f64, y: f64, w: f64, h: f64, confidence: f64) -> PersonDetection {
    PersonDetection {
        bbox: BoundingBox::new(x, y, w, h),
        confidence,
        label: "person".to_string(),
    }
}

/// Fails the calls whose zero-based index matches `fails_on`. Frames are
/// estimated in order, so the call index is the frame index.
struct Estimator {
    fails_on: fn(usize) -> bool,
    calls: AtomicUsize,
}

impl Estimator {
    fn working() -> Self {
        Self::failing_on(|_| false)
    }

    fn failing_on(fails_on: fn(usize) -> bool) -> Self {
        Self {
            fails_on,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PoseOracle for Estimator {
    async fn estimate(&self, _image: &EncodedImage, bbox: &BoundingBox) -> MlResult<Vec<PoseResult>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if (self.fails_on)(call) {
            return Err(MlError::ServiceUnavailable("pose model loading".into()));
        }
        let keypoints = (0..33)
            .map(|i| Keypoint::new(4.0 + (i % 8) as f64 * 3.0, 4.0 + (i / 8) as f64 * 5.0))
            .collect();
        Ok(vec![PoseResult {
            keypoints,
            scores: vec![0.9; 33],
            labels: (0..33).collect(),
            bbox: *bbox,
        }])
    }
}

/// Scores the first candidate label at `lead` and every other at 0.1.
struct Classifier {
    lead: f64,
    /// Calls that fail before the first success
    failures: usize,
    calls: AtomicUsize,
}

impl Classifier {
    fn scoring(lead: f64) -> Self {
        Self {
            lead,
            failures: 0,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing_first(failures: usize) -> Self {
        Self {
            failures,
            ..Self::scoring(0.8)
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassificationOracle for Classifier {
    async fn classify(&self, _image: &EncodedImage, candidate_labels: &[&str]) -> MlResult<LabelScores> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(MlError::ServiceUnavailable("model is currently loading".into()));
        }
        Ok(candidate_labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.to_string(), if i == 0 { self.lead } else { 0.1 }))
            .collect())
    }
}

struct Generator {
    fail: bool,
    calls: AtomicUsize,
}

impl Generator {
    fn new(fail: bool) -> Self {
        Self {
            fail,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationOracle for Generator {
    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> MlResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(prompt.contains(":\nStrengths: "));
        if self.fail {
            return Err(MlError::RequestFailed("500 Internal Server Error".into()));
        }
        Ok(r"  Great turn!\nKeep \that tempo.  ".to_string())
    }
}

struct Harness {
    detector: Arc<Detector>,
    estimator: Arc<Estimator>,
    classifier: Arc<Classifier>,
    generator: Arc<Generator>,
    pipeline: SwingPipeline,
}

fn harness(
    config: WorkerConfig,
    frames: usize,
    detector: Detector,
    estimator: Estimator,
    classifier: Classifier,
    generator: Generator,
) -> Harness {
    let detector = Arc::new(detector);
    let estimator = Arc::new(estimator);
    let classifier = Arc::new(classifier);
    let generator = Arc::new(generator);

    let oracles = Oracles {
        detection: detector.clone(),
        pose: estimator.clone(),
        classification: classifier.clone(),
        generation: generator.clone(),
    };
    let pipeline = SwingPipeline::standard(
        config,
        Arc::new(MemorySource { frames }),
        Arc::new(SkeletonRenderer::new()),
        oracles,
    );

    Harness {
        detector,
        estimator,
        classifier,
        generator,
        pipeline,
    }
}

#[tokio::test]
async fn test_standard_stage_order() {
    let h = harness(
        WorkerConfig {
            validate_swing: true,
            ..Default::default()
        },
        1,
        Detector::default(),
        Estimator::working(),
        Classifier::scoring(0.8),
        Generator::new(false),
    );

    assert_eq!(
        h.pipeline.stage_names(),
        vec![
            "sampling",
            "validation",
            "pose",
            "visualization",
            "segmentation",
            "classification",
            "feedback"
        ]
    );
}

#[tokio::test]
async fn test_full_run_classifies_every_phase() {
    let h = harness(
        WorkerConfig {
            classify_concurrency: 3,
            ..Default::default()
        },
        20,
        Detector::default(),
        Estimator::working(),
        Classifier::scoring(0.8),
        Generator::new(false),
    );

    let seq = h.pipeline.run("swing.mp4").await.unwrap();

    assert_eq!(seq.frames.len(), 20);
    assert_eq!(seq.rendered_count(), 20);
    assert_eq!(h.classifier.calls(), 20);
    assert_eq!(h.generator.calls(), 1);
    assert_eq!(seq.feedback, "Great turn!\nKeep that tempo.");

    // Two frames per phase, in order
    assert_eq!(seq.frames[0].phase, Some(SwingPhase::Address));
    assert_eq!(seq.frames[1].phase, Some(SwingPhase::Address));
    assert_eq!(seq.frames[19].phase, Some(SwingPhase::Finish));

    assert_eq!(seq.analysis.classified_count(), 10);
    let phases: Vec<_> = seq.analysis.phases.keys().copied().collect();
    assert_eq!(phases, SwingPhase::ALL.to_vec());

    let address = &seq.analysis.phases[&SwingPhase::Address];
    let lead = SwingPhase::Address.descriptors()[0];
    assert_eq!(address.strengths, vec![lead.to_string()]);
    assert!(address.areas_for_improvement.is_empty());
    assert!((address.confidence - 0.8).abs() < 1e-9);
    assert_eq!(address.all_scores.descriptors().next(), Some(lead));
    assert!(seq.analysis.flags().values().all(|&f| f == 1));
}

#[tokio::test]
async fn test_no_detections_and_no_poses() {
    let h = harness(
        WorkerConfig::default(),
        10,
        Detector::default(),
        Estimator::failing_on(|_| true),
        Classifier::scoring(0.8),
        Generator::new(false),
    );

    let seq = h.pipeline.run("swing.mp4").await.unwrap();

    assert_eq!(seq.frames.len(), 10);
    for annotated in &seq.frames {
        assert_eq!(annotated.golfer_box, Some(BoundingBox::whole_frame(SIZE, SIZE)));
        assert!(annotated.pose.is_none());
        assert!(annotated.rendering.is_none());
    }

    let flags = seq.analysis.flags();
    assert_eq!(flags.len(), 10);
    assert!(flags.values().all(|&f| f == 0));
    for phase in SwingPhase::ALL {
        assert_eq!(seq.analysis.detection_of(phase), Some(PhaseDetection::NoFrames));
    }

    assert_eq!(seq.feedback, NO_ANALYSIS_FEEDBACK);
    assert_eq!(h.detector.calls.load(Ordering::SeqCst), 10);
    assert_eq!(h.classifier.calls(), 0);
    assert_eq!(h.generator.calls(), 0);
}

#[tokio::test]
async fn test_selected_detection_becomes_golfer_box() {
    let golfer = person(8.0, 4.0, 16.0, 24.0, 0.6);
    let bystander = person(0.0, 0.0, 4.0, 6.0, 0.95);
    let h = harness(
        WorkerConfig::default(),
        10,
        Detector {
            people: vec![bystander, golfer.clone()],
            ..Default::default()
        },
        Estimator::working(),
        Classifier::scoring(0.8),
        Generator::new(false),
    );

    let seq = h.pipeline.run("swing.mp4").await.unwrap();

    for annotated in &seq.frames {
        assert_eq!(annotated.golfer_box, Some(golfer.bbox));
        // The estimator is cropped to the selected box
        assert_eq!(annotated.pose.as_ref().map(|p| p.bbox), Some(golfer.bbox));
    }
    assert_eq!(h.estimator.calls.load(Ordering::SeqCst), 10);
    assert_eq!(seq.analysis.classified_count(), 10);
}

#[tokio::test]
async fn test_partial_pose_failure_skips_only_failed_frames() {
    // Both Address frames and the first Takeaway frame
    let h = harness(
        WorkerConfig::default(),
        20,
        Detector::default(),
        Estimator::failing_on(|call| call < 3),
        Classifier::scoring(0.8),
        Generator::new(false),
    );

    let seq = h.pipeline.run("swing.mp4").await.unwrap();

    assert_eq!(seq.frames.len(), 20);
    assert_eq!(seq.pose_count(), 17);
    assert_eq!(seq.rendered_count(), 17);
    assert!(seq.frames[..3].iter().all(|f| f.pose.is_none()));
    assert!(seq.frames[3..].iter().all(|f| f.pose.is_some()));

    assert_eq!(h.estimator.calls.load(Ordering::SeqCst), 20);
    assert_eq!(h.classifier.calls(), 17);
    assert_eq!(
        seq.analysis.detection_of(SwingPhase::Address),
        Some(PhaseDetection::NoFrames)
    );
    assert_eq!(seq.analysis.classified_count(), 9);
    let takeaway = &seq.analysis.phases[&SwingPhase::Takeaway];
    assert!((takeaway.confidence - 0.8).abs() < 1e-9);
    assert_eq!(h.generator.calls(), 1);
}

#[tokio::test]
async fn test_empty_video_fails_at_sampling() {
    let h = harness(
        WorkerConfig::default(),
        0,
        Detector::default(),
        Estimator::working(),
        Classifier::scoring(0.8),
        Generator::new(false),
    );

    let failure = h.pipeline.run("empty.mp4").await.unwrap_err();

    assert_eq!(failure.stage, "sampling");
    assert!(matches!(failure.cause, WorkerError::NoFrames));
    assert!(failure.is_unusable_video());
    assert_eq!(h.detector.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.generator.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_transient_classification_failures_are_retried() {
    let h = harness(
        WorkerConfig::default(),
        10,
        Detector::default(),
        Estimator::working(),
        Classifier::failing_first(2),
        Generator::new(false),
    );

    let started = tokio::time::Instant::now();
    let seq = h.pipeline.run("swing.mp4").await.unwrap();

    // Frame 0 needed three attempts, separated by 1s and 2s
    assert_eq!(h.classifier.calls(), 12);
    assert!(started.elapsed() >= Duration::from_secs(3));
    assert_eq!(seq.analysis.classified_count(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_failed_frame_is_left_out_of_phase_average() {
    let h = harness(
        WorkerConfig::default(),
        20,
        Detector::default(),
        Estimator::working(),
        Classifier::failing_first(3),
        Generator::new(false),
    );

    let seq = h.pipeline.run("swing.mp4").await.unwrap();

    // Frame 0 exhausts its three attempts, every other frame succeeds first time
    assert_eq!(h.classifier.calls(), 22);
    assert_eq!(
        seq.analysis.detection_of(SwingPhase::Address),
        Some(PhaseDetection::Classified)
    );
    let address = &seq.analysis.phases[&SwingPhase::Address];
    assert!((address.confidence - 0.8).abs() < 1e-9);
    assert_eq!(seq.analysis.classified_count(), 10);
    assert!(seq.analysis.flags().values().all(|&f| f == 1));
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_mark_phases_failed() {
    let h = harness(
        WorkerConfig::default(),
        10,
        Detector::default(),
        Estimator::working(),
        Classifier::failing_first(usize::MAX),
        Generator::new(false),
    );

    let seq = h.pipeline.run("swing.mp4").await.unwrap();

    assert_eq!(h.classifier.calls(), 30);
    for phase in SwingPhase::ALL {
        assert_eq!(seq.analysis.detection_of(phase), Some(PhaseDetection::Failed));
    }
    assert!(seq.analysis.phases.is_empty());
    assert_eq!(seq.feedback, NO_ANALYSIS_FEEDBACK);
    assert_eq!(h.generator.calls(), 0);
}

#[tokio::test]
async fn test_generation_failure_keeps_analysis() {
    let h = harness(
        WorkerConfig::default(),
        10,
        Detector::default(),
        Estimator::working(),
        Classifier::scoring(0.8),
        Generator::new(true),
    );

    let seq = h.pipeline.run("swing.mp4").await.unwrap();

    assert_eq!(seq.analysis.classified_count(), 10);
    assert_eq!(seq.feedback, GENERATION_FAILED_FEEDBACK);
    assert_eq!(h.generator.calls(), 1);
}

#[tokio::test]
async fn test_validation_rejects_non_swing() {
    let h = harness(
        WorkerConfig {
            validate_swing: true,
            ..Default::default()
        },
        12,
        Detector::default(),
        Estimator::working(),
        Classifier::scoring(0.2),
        Generator::new(false),
    );

    let failure = h.pipeline.run("cat.mp4").await.unwrap_err();

    assert_eq!(failure.stage, "validation");
    match failure.cause {
        WorkerError::NotAGolfSwing { best_score } => assert!((best_score - 0.2).abs() < 1e-9),
        other => panic!("unexpected cause: {other}"),
    }
    // Only the opening frames are checked
    assert_eq!(h.classifier.calls(), 10);
    assert_eq!(h.detector.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_validation_accepts_swing() {
    let h = harness(
        WorkerConfig {
            validate_swing: true,
            ..Default::default()
        },
        10,
        Detector::default(),
        Estimator::working(),
        Classifier::scoring(0.9),
        Generator::new(false),
    );

    let seq = h.pipeline.run("swing.mp4").await.unwrap();

    // One validation call, then one per frame
    assert_eq!(h.classifier.calls(), 11);
    assert_eq!(seq.analysis.classified_count(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_run_timeout_cancels_in_flight_call() {
    let h = harness(
        WorkerConfig {
            run_timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        },
        3,
        Detector {
            stall: Some(Duration::from_secs(60)),
            ..Default::default()
        },
        Estimator::working(),
        Classifier::scoring(0.8),
        Generator::new(false),
    );

    let failure = h.pipeline.run("swing.mp4").await.unwrap_err();

    assert_eq!(failure.stage, "pose");
    assert!(failure.cause.is_cancelled());
    assert_eq!(h.detector.calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.generator.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_oracle_deadline_fails_stage() {
    let h = harness(
        WorkerConfig {
            oracle_timeout: Duration::from_secs(2),
            ..Default::default()
        },
        3,
        Detector {
            stall: Some(Duration::from_secs(60)),
            ..Default::default()
        },
        Estimator::working(),
        Classifier::scoring(0.8),
        Generator::new(false),
    );

    let failure = h.pipeline.run("swing.mp4").await.unwrap_err();

    assert_eq!(failure.stage, "pose");
    assert!(matches!(failure.cause, WorkerError::DeadlineExceeded(_)));
    assert!(!failure.is_unusable_video());
}
