//! Built-in scattering engine.
//!
//! Specular reflectivity comes from a Parratt recursion over the layer
//! stack; the diffuse image is a dilute Born approximation (sphere form
//! factor times a lattice interference function, orientation-averaged in
//! the sample plane). This is a stand-in for the full physics engine that
//! honors the [`ScatteringEngine`] contract; quantitative accuracy of the
//! scattering model is out of scope.

use std::f64::consts::PI;

use gisans_core::DetectorGrid;
use gisans_models::{Interference, Layer, SampleDescription};
use num_complex::Complex64;

use crate::engine::{AlphaScan, Beam, EngineError, EngineOptions, ScatteringEngine};

const ANGSTROM_PER_NM: f64 = 10.0;

#[derive(Debug, Default, Clone)]
pub struct BornEngine {
    pub options: EngineOptions,
}

impl BornEngine {
    pub fn new(options: EngineOptions) -> Self {
        BornEngine { options }
    }

    /// Scattering length density of a layer in Å⁻², with particle layouts
    /// folded into their host layer when `use_avg_materials` is on.
    fn layer_sld(&self, layer: &Layer) -> Complex64 {
        let host = Complex64::new(layer.material.sld_re, layer.material.sld_im);
        if !self.options.use_avg_materials {
            return host;
        }
        match (&layer.layout, layer.thickness_nm) {
            (Some(layout), Some(thickness)) if thickness > 0.0 => {
                let volume = 4.0 / 3.0 * PI * layout.radius_nm.powi(3);
                let fraction = (layout.surface_density * volume / thickness).clamp(0.0, 1.0);
                let particle = Complex64::new(layout.particle.sld_re, layout.particle.sld_im);
                host + (particle - host) * fraction
            }
            _ => host,
        }
    }

    fn parratt(&self, sample: &SampleDescription, wavelength: f64, alpha_deg: f64) -> f64 {
        let layers = &sample.layers;
        if layers.len() < 2 {
            // no interface, nothing reflects
            return 0.0;
        }
        let k0 = 2.0 * PI / wavelength;
        let kz0 = k0 * alpha_deg.to_radians().abs().sin();
        let ambient = self.layer_sld(&layers[0]);

        // vertical wavevector component inside each layer
        let kz: Vec<Complex64> = layers
            .iter()
            .map(|layer| {
                let delta = self.layer_sld(layer) - ambient;
                (Complex64::new(kz0 * kz0, 0.0) - 4.0 * PI * delta).sqrt()
            })
            .collect();

        let mut r = Complex64::new(0.0, 0.0);
        for j in (0..layers.len() - 1).rev() {
            let denom = kz[j] + kz[j + 1];
            let fresnel = if denom.norm() == 0.0 {
                Complex64::new(0.0, 0.0)
            } else {
                (kz[j] - kz[j + 1]) / denom
            };
            let phase = match layers[j + 1].thickness_nm {
                Some(thickness_nm) => {
                    let d = thickness_nm * ANGSTROM_PER_NM;
                    (Complex64::i() * 2.0 * kz[j + 1] * d).exp()
                }
                None => Complex64::new(1.0, 0.0),
            };
            r = (fresnel + r * phase) / (Complex64::new(1.0, 0.0) + fresnel * r * phase);
        }
        r.norm_sqr().min(1.0)
    }

    /// Diffuse differential intensity at one outgoing direction, per unit
    /// solid angle. Angles in radians, detector frame.
    fn born_intensity(
        &self,
        sample: &SampleDescription,
        wavelength: f64,
        alpha_i: f64,
        alpha_f: f64,
        phi_f: f64,
    ) -> f64 {
        let k = 2.0 * PI / wavelength;
        let qx = k * (alpha_f.cos() * phi_f.cos() - alpha_i.cos());
        let qy = k * alpha_f.cos() * phi_f.sin();
        let qz = k * (alpha_f.sin() + alpha_i.sin());
        let q = (qx * qx + qy * qy + qz * qz).sqrt();
        let q_par = qx.hypot(qy);

        let mut intensity = 0.0;
        for layer in &sample.layers {
            let Some(layout) = &layer.layout else { continue };
            let radius = layout.radius_nm * ANGSTROM_PER_NM;
            let volume = 4.0 / 3.0 * PI * radius.powi(3);
            let host = Complex64::new(layer.material.sld_re, layer.material.sld_im);
            let particle = Complex64::new(layout.particle.sld_re, layout.particle.sld_im);
            let contrast = (particle - host).norm();
            let amplitude = contrast * volume * sphere_form_factor(q * radius);
            let density = layout.surface_density / (ANGSTROM_PER_NM * ANGSTROM_PER_NM);
            intensity += density * amplitude * amplitude * interference_factor(&layout.interference, q_par);
        }
        intensity
    }
}

/// Normalized sphere form factor `3 (sin x − x cos x) / x³`, 1 at x = 0.
fn sphere_form_factor(x: f64) -> f64 {
    if x.abs() < 1e-4 {
        // series limit, avoids 0/0
        1.0 - x * x / 10.0
    } else {
        3.0 * (x.sin() - x * x.cos()) / (x * x * x)
    }
}

/// In-plane interference function evaluated at `q_par` (Å⁻¹).
///
/// The models integrate over the lattice orientation, so only |q∥| enters:
/// each reciprocal-lattice ring contributes a Gaussian peak whose width
/// reflects the coherence model.
fn interference_factor(interference: &Interference, q_par: f64) -> f64 {
    let lattice = interference.lattice();
    let a = lattice.a * ANGSTROM_PER_NM;
    let b = lattice.b * ANGSTROM_PER_NM;
    let gamma = lattice.gamma_deg.to_radians();

    let sigma = match interference {
        Interference::FiniteLattice { size_1, .. } => 2.0 * PI / ((*size_1).max(1) as f64 * a),
        Interference::DecayingLattice { decay_nm, .. } => 1.0 / (decay_nm * ANGSTROM_PER_NM),
        Interference::Paracrystal { damping_nm, .. } => 1.0 / (damping_nm * ANGSTROM_PER_NM),
    };

    let ga = 2.0 * PI / (a * gamma.sin());
    let gb = 2.0 * PI / (b * gamma.sin());
    let cos_rec = (PI - gamma).cos();

    let mut s = 1.0;
    for h in -2i32..=2 {
        for k in -2i32..=2 {
            if h == 0 && k == 0 {
                continue;
            }
            let (hf, kf) = (h as f64, k as f64);
            let g2 = (hf * ga).powi(2) + (kf * gb).powi(2) + 2.0 * hf * kf * ga * gb * cos_rec;
            if g2 <= 0.0 {
                continue;
            }
            let g = g2.sqrt();
            let dev = (q_par - g) / sigma;
            s += (-0.5 * dev * dev).exp();
        }
    }
    s
}

impl ScatteringEngine for BornEngine {
    fn reflectivity(
        &self,
        sample: &SampleDescription,
        scan: &AlphaScan,
    ) -> Result<Vec<f64>, EngineError> {
        if sample.layers.is_empty() {
            return Err(EngineError::EmptySample);
        }
        if scan.angles_deg.is_empty() {
            return Err(EngineError::EmptyScan);
        }
        Ok(scan
            .angles_deg
            .iter()
            .map(|&alpha| self.parratt(sample, scan.wavelength, alpha))
            .collect())
    }

    fn intensity_map(
        &self,
        sample: &SampleDescription,
        beam: &Beam,
        grid: &DetectorGrid,
    ) -> Result<Vec<f64>, EngineError> {
        if sample.layers.is_empty() {
            return Err(EngineError::EmptySample);
        }
        let alpha_i = beam.alpha_i_deg.to_radians().abs();
        let solid_angle = grid.pixel_solid_angle();
        let n = grid.n();
        let mut map = Vec::with_capacity(grid.len());
        for iy in 0..n {
            let alpha_f = grid.alpha_center(iy).to_radians();
            for ix in 0..n {
                let phi_f = grid.phi_center(ix).to_radians();
                let per_solid_angle =
                    self.born_intensity(sample, beam.wavelength, alpha_i, alpha_f, phi_f);
                map.push(beam.weight * solid_angle * per_solid_angle);
            }
        }
        Ok(map)
    }
}
