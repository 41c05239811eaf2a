//! Batch mode: read a neutron event file, run every event through the
//! scattering pipeline and write the transformed events back out.

pub mod event_file;
pub mod pipeline;

use thiserror::Error;

pub use event_file::{read_event_file, write_event_file};
pub use pipeline::{propagate_to_surface, BatchContext, BatchOutcome};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("event file I/O failed")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error(transparent)]
    Model(#[from] gisans_models::ModelError),
    #[error(transparent)]
    Sim(#[from] gisans_sim::SimError),
}
