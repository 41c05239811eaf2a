//! Sample model descriptions and the named-provider registry.
//!
//! A model provider is a pure function from an azimuthal rotation angle
//! (degrees) to an immutable layered sample description. Providers are
//! resolved by name, the way the original batch files name their models.

pub mod catalog;
pub mod registry;
pub mod sample;

use thiserror::Error;

pub use registry::{available_models, register_model, resolve_model, ModelProvider};
pub use sample::{Interference, Lattice2D, Layer, Material, ParticleLayout, SampleDescription};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown sample model '{0}'")]
    UnknownModel(String),
}
