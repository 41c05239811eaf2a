//! Per-event simulation pipeline: specular and diffuse response calculators,
//! the output-event synthesizer and the per-connection worker that runs them.

pub mod born;
pub mod diffuse;
pub mod engine;
pub mod pipeline;
pub mod specular;
pub mod synth;
pub mod worker;

use thiserror::Error;

pub use born::BornEngine;
pub use engine::{AlphaScan, Beam, EngineError, EngineOptions, ScatteringEngine};
pub use pipeline::{respond_to_event, PipelineConfig};
pub use synth::{det_dim_for, synthesize};
pub use worker::{spawn_worker, WorkerConfig, WorkerHandle, WorkerLog, WorkerRequest};

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Kinematics(#[from] gisans_core::KinematicsError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Model(#[from] gisans_models::ModelError),
    #[error("failed to spawn worker thread")]
    Spawn(#[from] std::io::Error),
}
