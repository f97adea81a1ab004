//! Swing analysis worker binary.
//!
//! Usage: `swing-worker <video_path>`

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use swing_media::{FfmpegFrameSampler, SkeletonRenderer};
use swing_ml_client::{InferenceClient, OracleConfig, PoseClient};
use swing_worker::{metrics, write_analysis, Oracles, SwingPipeline, WorkerConfig};

fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("swing=info".parse()?)
        .add_directive("swing_worker=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

async fn build_pipeline(config: WorkerConfig) -> anyhow::Result<SwingPipeline> {
    let oracle_config = OracleConfig::from_env();
    oracle_config.validate()?;

    let inference = Arc::new(
        InferenceClient::new(oracle_config.clone()).context("creating inference client")?,
    );
    let pose = Arc::new(PoseClient::new(&oracle_config).context("creating pose client")?);
    if !pose.health_check().await {
        warn!("Pose service at {} is not healthy", oracle_config.pose_url);
    }

    let oracles = Oracles {
        detection: inference.clone(),
        pose,
        classification: inference.clone(),
        generation: inference,
    };

    Ok(SwingPipeline::standard(
        config,
        Arc::new(FfmpegFrameSampler::new()),
        Arc::new(SkeletonRenderer::new()),
        oracles,
    ))
}

#[tokio::main]
async fn main() -> ExitCode {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialise logging: {e:#}");
        return ExitCode::FAILURE;
    }

    let Some(video_path) = std::env::args().nth(1) else {
        eprintln!("usage: swing-worker <video_path>");
        return ExitCode::from(2);
    };

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    if let Some(addr) = config.metrics_addr {
        match metrics::install_exporter(addr) {
            Ok(()) => info!("Metrics listening on {}", addr),
            Err(e) => error!("Failed to install metrics exporter: {}", e),
        }
    }

    let output_dir = config.output_dir.clone();
    let pipeline = match build_pipeline(config).await {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to build pipeline: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Pipeline stages: {:?}", pipeline.stage_names());

    let sequence = match pipeline.run(&video_path).await {
        Ok(sequence) => sequence,
        Err(failure) if failure.is_unusable_video() => {
            error!("{}", failure);
            eprintln!("no usable video: {}", failure.message);
            return ExitCode::FAILURE;
        }
        Err(failure) => {
            error!("{}", failure);
            eprintln!("{failure}");
            return ExitCode::FAILURE;
        }
    };

    match write_analysis(&output_dir, &sequence).await {
        Ok(written) => {
            println!("{}", written.record_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to write analysis: {}", e);
            ExitCode::FAILURE
        }
    }
}
