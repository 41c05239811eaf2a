//! Built-in sample models, ported from the original model files.

use crate::sample::{
    Interference, Lattice2D, Layer, Material, ParticleLayout, SampleDescription,
};

/// Silica spheres on silicon, measured in air.
///
/// 60 nm SiO₂ spheres sit in a 120 nm air layer on a finite 5×5 patch of a
/// 125 nm lattice; the lattice rotates with the event's azimuthal angle.
pub fn silica_100nm_air(phi_deg: f64) -> SampleDescription {
    let air = Material::by_sld("Air", 0.0, 0.0);
    let silica = Material::by_sld("SiO2", 3.47e-6, 0.0);
    let silicon = Material::by_sld("Silicon", 2.07e-6, 0.0);

    let layout = ParticleLayout {
        particle: silica,
        radius_nm: 60.0,
        depth_nm: 120.0,
        interference: Interference::FiniteLattice {
            lattice: Lattice2D::basic(125.0, 125.0, 120.0, phi_deg),
            size_1: 5,
            size_2: 5,
        },
        surface_density: 7.390_083_445_63e-5,
    };

    SampleDescription::new(
        phi_deg,
        vec![
            Layer::semi_infinite(air.clone()),
            Layer::slab(air, 120.0).with_layout(layout),
            Layer::semi_infinite(silicon),
        ],
    )
}

// hexagonal close-packed colloid geometry
const SPHERE_RADIUS_NM: f64 = 37.0;
const COLLOID_DENSITY: f64 = 0.1;
const STACKED_CELLS: f64 = 6.0;

fn hexagonal_lattice_a() -> f64 {
    let closed_packed = std::f64::consts::PI / (3.0 * 2.0f64.sqrt());
    2.0 * SPHERE_RADIUS_NM * (closed_packed / COLLOID_DENSITY).cbrt()
}

/// Polystyrene spheres in D₂O on sapphire, stacked in a hexagonal colloid
/// crystal whose unit cell follows from the colloid volume fraction.
pub fn hexagonal_spheres(phi_deg: f64) -> SampleDescription {
    let polystyrene = Material::by_sld("PS", 1.358e-6, 2e-9);
    let d2o = Material::by_sld("D2O", 6.364e-6, 2e-9);
    let sapphire = Material::by_sld("Al2O3", 5.773e-6, 2e-9);

    let lattice_a = hexagonal_lattice_a();
    let lattice_c = 1.5 * 3.0f64.sqrt() * lattice_a;

    let layout = ParticleLayout {
        particle: polystyrene,
        radius_nm: SPHERE_RADIUS_NM,
        depth_nm: 2.0 * SPHERE_RADIUS_NM,
        interference: Interference::DecayingLattice {
            lattice: Lattice2D::hexagonal(lattice_a, phi_deg),
            decay_nm: 300.0,
        },
        surface_density: 2.0 / (3.0 * 3.0f64.sqrt() * lattice_a * lattice_a),
    };

    SampleDescription::new(
        phi_deg,
        vec![
            Layer::semi_infinite(sapphire),
            Layer::slab(d2o.clone(), STACKED_CELLS * lattice_c).with_layout(layout),
            Layer::semi_infinite(d2o),
        ],
    )
}
