//! Immutable building blocks of a layered sample: materials, 2-D particle
//! lattices, interference functions and the layer stack itself.

/// A material described by its complex scattering length density in Å⁻².
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: &'static str,
    pub sld_re: f64,
    pub sld_im: f64,
}

impl Material {
    pub fn by_sld(name: &'static str, sld_re: f64, sld_im: f64) -> Self {
        Material { name, sld_re, sld_im }
    }
}

/// A two-dimensional Bravais lattice; lengths in nm, angles in degrees.
/// `xi` is the in-plane rotation of the lattice against the beam frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice2D {
    pub a: f64,
    pub b: f64,
    pub gamma_deg: f64,
    pub xi_deg: f64,
}

impl Lattice2D {
    pub fn basic(a: f64, b: f64, gamma_deg: f64, xi_deg: f64) -> Self {
        Lattice2D { a, b, gamma_deg, xi_deg }
    }

    pub fn hexagonal(a: f64, xi_deg: f64) -> Self {
        Lattice2D { a, b: a, gamma_deg: 120.0, xi_deg }
    }
}

/// Lateral correlation model of a particle arrangement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interference {
    /// Perfect lattice of `size_1` × `size_2` repetitions.
    FiniteLattice { lattice: Lattice2D, size_1: u32, size_2: u32 },
    /// Infinite lattice with an exponential positional decay length in nm.
    DecayingLattice { lattice: Lattice2D, decay_nm: f64 },
    /// Paracrystal with a cumulative disorder damping length in nm.
    Paracrystal { lattice: Lattice2D, damping_nm: f64 },
}

impl Interference {
    pub fn lattice(&self) -> &Lattice2D {
        match self {
            Interference::FiniteLattice { lattice, .. } => lattice,
            Interference::DecayingLattice { lattice, .. } => lattice,
            Interference::Paracrystal { lattice, .. } => lattice,
        }
    }
}

/// Spherical particles arranged on a 2-D lattice inside a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleLayout {
    pub particle: Material,
    /// Sphere radius in nm.
    pub radius_nm: f64,
    /// Depth of the sphere centers below the layer top, in nm.
    pub depth_nm: f64,
    pub interference: Interference,
    /// Particles per nm².
    pub surface_density: f64,
}

/// One layer of the stack. `thickness_nm` is `None` for the semi-infinite
/// ambient and substrate layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub material: Material,
    pub thickness_nm: Option<f64>,
    pub layout: Option<ParticleLayout>,
}

impl Layer {
    pub fn semi_infinite(material: Material) -> Self {
        Layer { material, thickness_nm: None, layout: None }
    }

    pub fn slab(material: Material, thickness_nm: f64) -> Self {
        Layer { material, thickness_nm: Some(thickness_nm), layout: None }
    }

    pub fn with_layout(mut self, layout: ParticleLayout) -> Self {
        self.layout = Some(layout);
        self
    }
}

/// An immutable layer stack, ordered from the ambient medium at the top to
/// the substrate at the bottom, built for one azimuthal angle.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleDescription {
    pub layers: Vec<Layer>,
    /// Azimuthal angle the stack was built for, in degrees.
    pub phi_deg: f64,
}

impl SampleDescription {
    pub fn new(phi_deg: f64, layers: Vec<Layer>) -> Self {
        SampleDescription { layers, phi_deg }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hexagonal_lattice_fixes_gamma() {
        let lat = Lattice2D::hexagonal(125.0, 10.0);
        assert_eq!(lat.gamma_deg, 120.0);
        assert_eq!(lat.a, lat.b);
        assert_eq!(lat.xi_deg, 10.0);
    }

    #[test]
    fn layer_builders() {
        let si = Material::by_sld("Si", 2.07e-6, 0.0);
        let slab = Layer::slab(si.clone(), 120.0);
        assert_eq!(slab.thickness_nm, Some(120.0));
        assert!(Layer::semi_infinite(si).thickness_nm.is_none());
    }
}
