//! Clients for the remote scoring oracles.
//!
//! The pipeline talks to four opaque services: person detection, pose
//! estimation, zero-shot image classification and text generation. Each is
//! modeled as an injectable trait so tests can swap in deterministic stubs;
//! production wiring builds the HTTP implementations once at startup.

pub mod client;
pub mod config;
pub mod error;
pub mod oracle;
pub mod pose;
pub mod types;

pub use client::InferenceClient;
pub use config::OracleConfig;
pub use error::{MlError, MlResult};
pub use oracle::{
    ClassificationOracle, DetectionOracle, GenerationOracle, GenerationParams, LabelScores,
    PoseOracle,
};
pub use pose::PoseClient;
