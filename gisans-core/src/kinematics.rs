//! Conversion between neutron velocity vectors and beam parameters
//! (wavelength, incident angle, azimuthal angle).

use glam::DVec3;
use thiserror::Error;

/// Velocity to wavelength conversion factor for neutrons, in m/s·Å.
pub const V2L: f64 = 3956.034012;

#[derive(Debug, Error)]
pub enum KinematicsError {
    #[error("velocity vector has zero magnitude")]
    ZeroSpeed,
    #[error("angles ({alpha_deg}°, {phi_deg}°) fall outside the forward beam cone")]
    OutsideBeamCone { alpha_deg: f64, phi_deg: f64 },
}

/// Beam parameters derived from a velocity vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamParameters {
    /// Wavelength in Å.
    pub wavelength: f64,
    /// Incident (polar) angle in degrees, `atan2(vz, vy)`.
    pub alpha_i: f64,
    /// Azimuthal angle in degrees, `atan2(vx, vy)`.
    pub phi_i: f64,
    /// Speed in m/s.
    pub speed: f64,
}

/// Decomposes a velocity into (wavelength, incident angle, azimuthal angle,
/// speed). Fails for the zero vector, which has no direction.
pub fn beam_from_velocity(v: DVec3) -> Result<BeamParameters, KinematicsError> {
    let speed = v.length();
    if speed == 0.0 {
        return Err(KinematicsError::ZeroSpeed);
    }
    Ok(BeamParameters {
        wavelength: V2L / speed,
        alpha_i: v.z.atan2(v.y).to_degrees(),
        phi_i: v.x.atan2(v.y).to_degrees(),
        speed,
    })
}

/// Inverse of [`beam_from_velocity`]: recovers a velocity from an angle pair
/// and a speed.
///
/// Uses the tangent form `vy = speed / sqrt(1 + tan²α + tan²φ)`, which
/// satisfies `vy = sqrt(speed² − vx² − vz²)` identically and round-trips
/// `beam_from_velocity` exactly up to floating-point error. Angles at or
/// beyond ±90° would put the direction outside the physical beam cone and
/// are reported as a domain error; callers must clamp their grids instead.
pub fn velocity_from_beam(
    alpha_deg: f64,
    phi_deg: f64,
    speed: f64,
) -> Result<DVec3, KinematicsError> {
    // compare in degrees: cos(±90°.to_radians()) is a tiny positive number,
    // not zero, and the negated form also rejects NaN angles
    if !(alpha_deg.abs() < 90.0) || !(phi_deg.abs() < 90.0) {
        return Err(KinematicsError::OutsideBeamCone { alpha_deg, phi_deg });
    }
    let ta = alpha_deg.to_radians().tan();
    let tp = phi_deg.to_radians().tan();
    let vy = speed / (1.0 + ta * ta + tp * tp).sqrt();
    Ok(DVec3::new(vy * tp, vy, vy * ta))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} != {b} (tol {tol})");
    }

    #[test]
    fn wavelength_from_speed() {
        let beam = beam_from_velocity(DVec3::new(0.0, 659.339002, 0.0)).unwrap();
        // 6 Å neutrons travel at V2L/6 m/s
        assert_close(beam.wavelength, 6.0, 1e-9);
        assert_close(beam.alpha_i, 0.0, 1e-12);
        assert_close(beam.phi_i, 0.0, 1e-12);
    }

    #[test]
    fn round_trip_restores_velocity() {
        let cases = [
            DVec3::new(0.01, 1.0, 0.001),
            DVec3::new(-3.0, 600.0, -2.5),
            DVec3::new(0.0, 250.0, 12.0),
            DVec3::new(40.0, 400.0, -40.0),
        ];
        for v in cases {
            let beam = beam_from_velocity(v).unwrap();
            let back = velocity_from_beam(beam.alpha_i, beam.phi_i, beam.speed).unwrap();
            assert_close(back.x, v.x, 1e-9 * beam.speed);
            assert_close(back.y, v.y, 1e-9 * beam.speed);
            assert_close(back.z, v.z, 1e-9 * beam.speed);
        }
    }

    #[test]
    fn inverse_satisfies_speed_constraint() {
        let v = velocity_from_beam(1.3, -0.7, 500.0).unwrap();
        assert_close(v.length(), 500.0, 1e-9);
        assert_close(v.y, (500.0f64.powi(2) - v.x * v.x - v.z * v.z).sqrt(), 1e-9);
    }

    #[test]
    fn angles_outside_cone_are_domain_errors() {
        assert!(matches!(
            velocity_from_beam(95.0, 0.0, 100.0),
            Err(KinematicsError::OutsideBeamCone { .. })
        ));
        assert!(matches!(
            velocity_from_beam(0.0, -90.0, 100.0),
            Err(KinematicsError::OutsideBeamCone { .. })
        ));
    }

    #[test]
    fn cone_boundary_and_nan_angles_are_rejected() {
        // exactly ±90° sits on the cone boundary; cos() of the radian value
        // is not quite zero there, so the guard must not rely on it
        for angle in [90.0, -90.0] {
            assert!(matches!(
                velocity_from_beam(angle, 0.0, 100.0),
                Err(KinematicsError::OutsideBeamCone { .. })
            ));
            assert!(matches!(
                velocity_from_beam(0.0, angle, 100.0),
                Err(KinematicsError::OutsideBeamCone { .. })
            ));
        }
        assert!(matches!(
            velocity_from_beam(f64::NAN, 0.0, 100.0),
            Err(KinematicsError::OutsideBeamCone { .. })
        ));
        assert!(matches!(
            velocity_from_beam(0.0, f64::NAN, 100.0),
            Err(KinematicsError::OutsideBeamCone { .. })
        ));
        // just inside the boundary still resolves
        assert!(velocity_from_beam(89.999, 0.0, 100.0).is_ok());
    }

    #[test]
    fn zero_velocity_is_rejected() {
        assert!(matches!(
            beam_from_velocity(DVec3::ZERO),
            Err(KinematicsError::ZeroSpeed)
        ));
    }
}
