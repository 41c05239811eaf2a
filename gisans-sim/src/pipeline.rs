//! The per-event pipeline shared by the socket worker: specular split,
//! diffuse image, synthesis of the fixed-length response.

use gisans_core::{beam_from_velocity, ScatterEvent};
use gisans_models::ModelProvider;
use rand::Rng;

use crate::engine::ScatteringEngine;
use crate::specular::specular_split;
use crate::synth::synthesize;
use crate::{diffuse::diffuse_events, SimError};

/// Fixed parameters of one worker's pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Events owed to the caller per incident event.
    pub odim: usize,
    /// Detector half-width in degrees.
    pub ang_range: f64,
    /// Detector pixels per axis.
    pub det_dim: usize,
}

/// Turns one incoming event into exactly `odim` outgoing events.
///
/// The sample is rebuilt for the event's azimuthal angle, so differently
/// rotated events never share a stale description.
pub fn respond_to_event<R: Rng>(
    engine: &dyn ScatteringEngine,
    provider: ModelProvider,
    config: &PipelineConfig,
    incident: &ScatterEvent,
    rng: &mut R,
) -> Result<Vec<ScatterEvent>, SimError> {
    let beam = beam_from_velocity(incident.v)?;
    let sample = provider(beam.phi_i);

    let split = specular_split(engine, &sample, &beam, incident)?;

    let jitter = (rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
    let diffuse = diffuse_events(
        engine,
        &sample,
        &beam,
        incident.p,
        jitter,
        config.det_dim,
        config.ang_range,
    )?;

    Ok(synthesize(split.reflected, split.transmitted, diffuse, config.odim, rng))
}
