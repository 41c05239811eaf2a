//! Specular response: splits one incident event into a reflected and a
//! transmitted event.

use gisans_core::{BeamParameters, ScatterEvent};
use gisans_models::SampleDescription;

use crate::engine::{AlphaScan, EngineError, ScatteringEngine};
use crate::SimError;

/// Transmitted weights below this are considered negligible and may be
/// dropped by pipelines that do not owe the caller a fixed event count.
pub const TRANSMISSION_FLOOR: f64 = 1e-10;

/// Result of the specular pass for one incident event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecularSplit {
    /// Reflected fraction in [0, 1].
    pub reflectivity: f64,
    /// Mirror-reflected event: vz negated, weight `p_in * reflectivity`.
    pub reflected: ScatterEvent,
    /// Transmitted event: velocity unchanged, weight `p_in − p_reflected`
    /// so that reflected and transmitted weights sum to the incident weight
    /// exactly.
    pub transmitted: ScatterEvent,
}

impl SpecularSplit {
    /// Whether the transmitted weight is below [`TRANSMISSION_FLOOR`].
    pub fn transmitted_negligible(&self) -> bool {
        self.transmitted.p < TRANSMISSION_FLOOR
    }
}

/// Runs the two-point specular scan and derives the reflected and
/// transmitted events from the reflectivity at the working angle.
pub fn specular_split(
    engine: &dyn ScatteringEngine,
    sample: &SampleDescription,
    beam: &BeamParameters,
    incident: &ScatterEvent,
) -> Result<SpecularSplit, SimError> {
    let scan = AlphaScan::two_point(beam.alpha_i, beam.wavelength);
    let curve = engine.reflectivity(sample, &scan)?;
    let reflectivity = curve
        .first()
        .copied()
        .ok_or(EngineError::EmptyScan)?
        .clamp(0.0, 1.0);

    let p_reflected = incident.p * reflectivity;
    let mut mirrored = incident.v;
    mirrored.z = -mirrored.z;

    Ok(SpecularSplit {
        reflectivity,
        reflected: ScatterEvent { p: p_reflected, v: mirrored },
        transmitted: ScatterEvent { p: incident.p - p_reflected, v: incident.v },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gisans_core::beam_from_velocity;
    use gisans_models::catalog::silica_100nm_air;

    use crate::born::BornEngine;

    fn split_for(incident: ScatterEvent) -> SpecularSplit {
        let beam = beam_from_velocity(incident.v).unwrap();
        let sample = silica_100nm_air(beam.phi_i);
        specular_split(&BornEngine::default(), &sample, &beam, &incident).unwrap()
    }

    #[test]
    fn weights_are_conserved_exactly() {
        let incident = ScatterEvent::new(0.7, 1.0, 600.0, -3.0);
        let split = split_for(incident);
        assert_eq!(split.reflected.p + split.transmitted.p, incident.p);
        assert!(split.reflected.p >= 0.0 && split.transmitted.p >= 0.0);
    }

    #[test]
    fn reflection_negates_vz_only() {
        let incident = ScatterEvent::new(1.0, 1.0, 600.0, -3.0);
        let split = split_for(incident);
        assert_eq!(split.reflected.v.x, incident.v.x);
        assert_eq!(split.reflected.v.y, incident.v.y);
        assert_eq!(split.reflected.v.z, -incident.v.z);
        assert_eq!(split.transmitted.v, incident.v);
    }

    #[test]
    fn total_reflection_makes_transmission_negligible() {
        // grazing angle far below critical: everything reflects
        let incident = ScatterEvent::new(1.0, 0.0, 600.0, -0.3);
        let split = split_for(incident);
        assert!(split.reflectivity > 0.99);
        assert!(split.transmitted_negligible());
    }
}
