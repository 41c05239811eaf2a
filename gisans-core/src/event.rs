use glam::DVec3;

/// Reduced event form exchanged over the socket: a probability weight and a
/// velocity in m/s. The weight is a non-negative scaling factor, not a count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterEvent {
    pub p: f64,
    pub v: DVec3,
}

impl ScatterEvent {
    pub fn new(p: f64, vx: f64, vy: f64, vz: f64) -> Self {
        ScatterEvent {
            p,
            v: DVec3::new(vx, vy, vz),
        }
    }
}

/// Full event record as stored in batch-mode event files:
/// weight, position (m), velocity (m/s), time (s) and spin.
///
/// Events are values; transformations always produce a new event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeutronEvent {
    pub p: f64,
    pub pos: DVec3,
    pub v: DVec3,
    pub t: f64,
    pub spin: DVec3,
}

impl NeutronEvent {
    /// Copy of this event with a new weight and velocity, position, time and
    /// spin carried over unchanged.
    pub fn with_velocity(&self, p: f64, v: DVec3) -> Self {
        NeutronEvent { p, v, ..*self }
    }

    /// Reduced wire form of this event.
    pub fn scatter_event(&self) -> ScatterEvent {
        ScatterEvent { p: self.p, v: self.v }
    }
}
