//! The implicit radial grid on which all wavefunctions are sampled.

use ndarray as nd;
use crate::error::GridError;

pub type GridResult<T> = Result<T, GridError>;

/// An evenly spaced radial grid starting at the origin.
///
/// Point `i` sits at `r[i] = i * dr` for `i` in `0..n`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RadialGrid {
    n: usize,
    dr: f64,
}

impl RadialGrid {
    /// Create a new grid of `n` points with spacing `dr`.
    pub fn new(n: usize, dr: f64) -> GridResult<Self> {
        if n == 0 { return Err(GridError::Empty); }
        if !(dr > 0.0 && dr.is_finite()) { return Err(GridError::BadStep(dr)); }
        Ok(Self { n, dr })
    }

    /// Number of grid points.
    pub fn len(&self) -> usize { self.n }

    /// Always `false`; grids are never empty.
    pub fn is_empty(&self) -> bool { false }

    /// Grid spacing.
    pub fn dr(&self) -> f64 { self.dr }

    /// Radius of the `i`-th point.
    pub fn r(&self, i: usize) -> f64 { i as f64 * self.dr }

    /// Radius of the outermost point, `(n - 1) * dr`.
    pub fn r_last(&self) -> f64 { self.r(self.n - 1) }

    /// Materialize all radii as an array.
    pub fn radii(&self) -> nd::Array1<f64> {
        (0..self.n).map(|i| self.r(i)).collect()
    }
}
