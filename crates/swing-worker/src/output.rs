//! Persist a finished run: frame images plus the JSON analysis record.
//!
//! Layout under the output root:
//! ```text
//! <analysis_id>/frames/frame_{i}.jpg
//! <analysis_id>/annotated/frame_{i}_annotated.jpg
//! <analysis_id>/analysis.json
//! ```
//! Image locations in the record are relative to the output root.

use std::path::{Path, PathBuf};

use swing_media::encode_frame;
use swing_models::{AnalysisRecord, SwingSequence};
use tokio::fs;
use tracing::info;

use crate::error::WorkerResult;

pub const RECORD_FILE: &str = "analysis.json";

/// Where a run was written.
#[derive(Debug, Clone)]
pub struct WrittenAnalysis {
    pub dir: PathBuf,
    pub record_path: PathBuf,
    pub record: AnalysisRecord,
}

pub async fn write_analysis(
    output_dir: &Path,
    sequence: &SwingSequence,
) -> WorkerResult<WrittenAnalysis> {
    let id = sequence.analysis_id.as_str();
    let dir = output_dir.join(id);
    fs::create_dir_all(dir.join("frames")).await?;
    fs::create_dir_all(dir.join("annotated")).await?;

    let mut frames = Vec::with_capacity(sequence.frames.len());
    let mut annotated_frames = Vec::new();

    for annotated in &sequence.frames {
        let i = annotated.index();

        let name = format!("frame_{i}.jpg");
        let image = encode_frame(&annotated.frame)?;
        fs::write(dir.join("frames").join(&name), &image.bytes).await?;
        frames.push(format!("{id}/frames/{name}"));

        if let Some(rendering) = &annotated.rendering {
            let name = format!("frame_{i}_annotated.jpg");
            fs::write(dir.join("annotated").join(&name), &rendering.bytes).await?;
            annotated_frames.push(format!("{id}/annotated/{name}"));
        }
    }

    let record = AnalysisRecord::from_sequence(
        sequence,
        sequence.video_path.display().to_string(),
        frames,
        annotated_frames,
    );

    let record_path = dir.join(RECORD_FILE);
    fs::write(&record_path, serde_json::to_vec_pretty(&record)?).await?;

    info!(
        analysis_id = %sequence.analysis_id,
        frames = record.frames.len(),
        annotated = record.annotated_frames.len(),
        "Wrote analysis to {}",
        record_path.display()
    );

    Ok(WrittenAnalysis {
        dir,
        record_path,
        record,
    })
}
