//! Diffuse response: one engine call per incident event, producing exactly
//! n² outgoing events on a jittered detector grid.

use gisans_core::{velocity_from_beam, BeamParameters, DetectorGrid, ScatterEvent};
use gisans_models::SampleDescription;

use crate::engine::{Beam, EngineError, ScatteringEngine};
use crate::SimError;

/// Computes the diffuse intensity image and converts every pixel into an
/// outgoing event.
///
/// The grid is offset by the per-event jitter pair `(ry, rz)`, each in
/// [-1, 1]. Pixel azimuths are corrected by the incident azimuthal angle so
/// the outgoing direction composes in the lab frame, and every outgoing
/// event keeps the incident speed.
pub fn diffuse_events(
    engine: &dyn ScatteringEngine,
    sample: &SampleDescription,
    beam: &BeamParameters,
    weight: f64,
    jitter: (f64, f64),
    det_dim: usize,
    ang_range: f64,
) -> Result<Vec<ScatterEvent>, SimError> {
    let grid = DetectorGrid::with_jitter(det_dim, ang_range, jitter.0, jitter.1);
    let engine_beam = Beam {
        weight,
        wavelength: beam.wavelength,
        alpha_i_deg: beam.alpha_i,
    };
    let map = engine.intensity_map(sample, &engine_beam, &grid)?;
    if map.len() != grid.len() {
        return Err(EngineError::Shape { expected: grid.len(), got: map.len() }.into());
    }

    let n = grid.n();
    let mut events = Vec::with_capacity(grid.len());
    for iy in 0..n {
        // positive detector alpha scatters away from the surface (negative vz)
        let alpha_f = grid.alpha_center(iy);
        for ix in 0..n {
            let phi_f = grid.phi_center(ix) - beam.phi_i;
            let v = velocity_from_beam(-alpha_f, phi_f, beam.speed)?;
            events.push(ScatterEvent { p: map[iy * n + ix], v });
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gisans_core::beam_from_velocity;
    use gisans_models::catalog::silica_100nm_air;
    use glam::DVec3;

    use crate::born::BornEngine;

    #[test]
    fn produces_exactly_n_squared_events_at_incident_speed() {
        let v_in = DVec3::new(0.01, 600.0, -3.0);
        let beam = beam_from_velocity(v_in).unwrap();
        let sample = silica_100nm_air(beam.phi_i);
        let events = diffuse_events(
            &BornEngine::default(),
            &sample,
            &beam,
            1.0,
            (0.25, -0.75),
            10,
            1.5,
        )
        .unwrap();
        assert_eq!(events.len(), 100);
        for event in &events {
            assert!(event.p >= 0.0);
            assert!((event.v.length() - beam.speed).abs() < 1e-9 * beam.speed);
        }
    }

    #[test]
    fn jitter_moves_every_outgoing_direction() {
        let beam = beam_from_velocity(DVec3::new(0.0, 600.0, -3.0)).unwrap();
        let sample = silica_100nm_air(beam.phi_i);
        let engine = BornEngine::default();
        let centered =
            diffuse_events(&engine, &sample, &beam, 1.0, (0.0, 0.0), 5, 1.5).unwrap();
        let shifted =
            diffuse_events(&engine, &sample, &beam, 1.0, (1.0, 1.0), 5, 1.5).unwrap();
        for (a, b) in centered.iter().zip(&shifted) {
            assert!(a.v != b.v);
        }
    }
}
