//! Interface to the scattering-physics engine.
//!
//! The engine is an external collaborator as far as the pipeline is
//! concerned: given a sample and beam parameters it produces either a
//! reflectivity curve or an intensity image on a detector grid. The built-in
//! implementation lives in [`crate::born`]; anything satisfying this trait
//! can be swapped in.

use gisans_core::DetectorGrid;
use gisans_models::SampleDescription;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("sample has no layers")]
    EmptySample,
    #[error("angular scan contains no points")]
    EmptyScan,
    #[error("intensity map has {got} pixels, detector expects {expected}")]
    Shape { expected: usize, got: usize },
}

/// Incident beam for a scattering run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beam {
    /// Probability weight carried by the incident neutron.
    pub weight: f64,
    /// Wavelength in Å.
    pub wavelength: f64,
    /// Grazing incident angle in degrees.
    pub alpha_i_deg: f64,
}

/// A sequence of incident angles scanned at one wavelength.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaScan {
    /// Wavelength in Å.
    pub wavelength: f64,
    /// Incident angles in degrees.
    pub angles_deg: Vec<f64>,
}

/// Offset of the second scan point, in radians. The engine refuses
/// single-point scans, so the working angle is duplicated a negligible
/// distance away and only the first point is read back.
pub const SCAN_EPSILON_RAD: f64 = 1e-6;

impl AlphaScan {
    /// Two-point scan at `alpha_i_deg` whose second point is offset by
    /// [`SCAN_EPSILON_RAD`].
    pub fn two_point(alpha_i_deg: f64, wavelength: f64) -> Self {
        AlphaScan {
            wavelength,
            angles_deg: vec![alpha_i_deg, alpha_i_deg + SCAN_EPSILON_RAD.to_degrees()],
        }
    }
}

/// Engine tuning knobs mirroring the upstream simulation options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Average particle layouts into their host layer for the specular pass.
    pub use_avg_materials: bool,
    /// Engine-internal thread count. Kept at 1: parallelism comes from one
    /// worker per connection, not from inside a simulation call.
    pub threads: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions { use_avg_materials: true, threads: 1 }
    }
}

/// The scattering-physics engine boundary.
pub trait ScatteringEngine: Send + Sync {
    /// Reflectivity (fraction in [0, 1]) for every angle of `scan`.
    fn reflectivity(
        &self,
        sample: &SampleDescription,
        scan: &AlphaScan,
    ) -> Result<Vec<f64>, EngineError>;

    /// Intensity per detector pixel, row-major with the alpha axis outer,
    /// of length `grid.len()`. Values incorporate the beam weight.
    fn intensity_map(
        &self,
        sample: &SampleDescription,
        beam: &Beam,
        grid: &DetectorGrid,
    ) -> Result<Vec<f64>, EngineError>;
}
