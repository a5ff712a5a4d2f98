//! Exact solution for a freely dispersing, spherically symmetric Gaussian
//! wavepacket.
//!
//! With initial width *w* and mass *m*, the free Schrödinger equation is solved
//! in closed form by
//! ```text
//!                   1                           z(t)^(3/2)          r² z(t)
//! z(t) = ---------------------- ,    ψ(r, t) = ------------ exp( - ------- )
//!        1 + i ħ t / (m w²)                    (√π w)^(3/2)           2 w²
//! ```
//! where *ħ*/*m* is evaluated in the simulation units via
//! [`K_DISPERSION`][crate::units::K_DISPERSION]. The packet stays normalized
//! under the radial measure 4π *r*² d*r* for all *t*.
//!
//! This is the baseline against which the simulated (self-gravitating)
//! evolution is judged: any difference is attributable to the interaction.
//!
//! ```
//! use sndisp::{ free::FreeParams, grid::RadialGrid };
//!
//! let params = FreeParams::new(500.0, 50.0e9);
//! let grid = RadialGrid::new(5100, 0.6).unwrap();
//! let psi = params.evaluate(1.0e9, &grid);
//! assert_eq!(psi.len(), 5100);
//! ```

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{ grid::RadialGrid, units::K_DISPERSION };

/// Ratio r90 / w for the initial Gaussian, i.e. the radius enclosing 90% of
/// r² exp(-r²/w²) in units of w.
pub const R90_GAUSSIAN: f64 = 1.76796332416;

/// Parameters of the free reference solution.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FreeParams {
    /// Initial width (nm).
    pub w: f64,
    /// Particle mass (u).
    pub m: f64,
}

impl FreeParams {
    pub fn new(w: f64, m: f64) -> Self { Self { w, m } }

    /// Return `true` if both width and mass are positive and finite; otherwise
    /// *z* is undefined.
    pub fn is_physical(&self) -> bool {
        self.w > 0.0 && self.w.is_finite() && self.m > 0.0 && self.m.is_finite()
    }

    /// Complex dispersion factor *z*(*t*).
    pub fn z(&self, time: f64) -> C64 {
        C64::new(1.0, K_DISPERSION * time / (self.m * self.w.powi(2))).inv()
    }

    /// Evaluate the free solution at a single radius.
    pub fn psi(&self, time: f64, r: f64) -> C64 {
        let z = self.z(time);
        self.psi_with(z, r)
    }

    fn psi_with(&self, z: C64, r: f64) -> C64 {
        (z / PI.sqrt() / self.w).powf(1.5)
            * (-r.powi(2) * z / (2.0 * self.w.powi(2))).exp()
    }

    /// Evaluate the free solution over a grid.
    pub fn evaluate(&self, time: f64, grid: &RadialGrid) -> nd::Array1<C64> {
        free_solution(self.w, self.m, time, grid.len(), grid.dr())
    }

    /// Peak of the radial density r²|ψ|² at *t* = 0, which is simply *w*.
    pub fn rmax_initial(&self) -> f64 { self.w }

    /// Radius enclosing 90% of the radial density at *t* = 0.
    pub fn r90_initial(&self) -> f64 { R90_GAUSSIAN * self.w }
}

/// Compute the free solution for width `w` and mass `m` at time `time` over
/// `n` grid points spaced by `dr`.
pub fn free_solution(w: f64, m: f64, time: f64, n: usize, dr: f64)
    -> nd::Array1<C64>
{
    let params = FreeParams::new(w, m);
    let z = params.z(time);
    (0..n).map(|i| params.psi_with(z, i as f64 * dr)).collect()
}
