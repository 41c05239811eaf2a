//! Square angular detector grid used by the diffuse response calculator.

/// An n×n pixel grid spanning ±`ang_range` degrees on the azimuthal (phi)
/// and polar (alpha) axes, optionally shifted by a sub-pixel jitter.
///
/// The jitter displaces the whole grid by `r * ang_range / n` degrees per
/// axis for `r` in [-1, 1], so repeated events sample angles between the
/// fixed bin centers instead of aliasing onto them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorGrid {
    n: usize,
    ang_range: f64,
    phi_offset: f64,
    alpha_offset: f64,
}

impl DetectorGrid {
    /// Grid with bin centers exactly symmetric around zero.
    pub fn new(n: usize, ang_range: f64) -> Self {
        Self::with_jitter(n, ang_range, 0.0, 0.0)
    }

    /// Grid shifted by a jitter pair: `ry` moves the alpha axis, `rz` the
    /// phi axis, both in units of `ang_range / n` degrees.
    pub fn with_jitter(n: usize, ang_range: f64, ry: f64, rz: f64) -> Self {
        debug_assert!(n > 0, "detector grid needs at least one pixel");
        let scale = ang_range / n as f64;
        DetectorGrid {
            n,
            ang_range,
            phi_offset: rz * scale,
            alpha_offset: ry * scale,
        }
    }

    /// Pixels per axis.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Total pixel count, and the length of a matching intensity map.
    pub fn len(&self) -> usize {
        self.n * self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Angular half-width in degrees.
    pub fn ang_range(&self) -> f64 {
        self.ang_range
    }

    /// Azimuthal bin-center angle of column `ix`, in degrees, ascending.
    pub fn phi_center(&self, ix: usize) -> f64 {
        self.center(ix) + self.phi_offset
    }

    /// Polar bin-center angle of row `iy`, in degrees, ascending.
    pub fn alpha_center(&self, iy: usize) -> f64 {
        self.center(iy) + self.alpha_offset
    }

    /// Solid angle subtended by one pixel, in steradians.
    pub fn pixel_solid_angle(&self) -> f64 {
        let step = (2.0 * self.ang_range / self.n as f64).to_radians();
        step * step
    }

    fn center(&self, i: usize) -> f64 {
        let step = 2.0 * self.ang_range / self.n as f64;
        -self.ang_range + (i as f64 + 0.5) * step
    }
}
