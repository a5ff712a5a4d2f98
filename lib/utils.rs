//! Miscellaneous tools.

use std::f64::consts::PI;
use ndarray::{ self as nd, Ix1 };
use num_complex::Complex64 as C64;
use num_traits::Float;
use crate::grid::RadialGrid;

/// Integrate using the trapezoidal rule.
///
/// Arrays of length less than 2 integrate to zero.
pub fn trapz<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Float,
{
    let n: usize = y.len();
    if n < 2 { return A::zero(); }
    let two = A::one() + A::one();
    let inner = y.slice(nd::s![1..n - 1]).iter()
        .fold(A::zero(), |acc, yk| acc + *yk);
    (dx / two) * (y[0] + two * inner + y[n - 1])
}

/// Calculate the norm of a radial wavefunction under the measure 4π r² dr.
///
/// Conserved by both the free and the simulated evolution.
pub fn radial_norm<S>(q: &nd::ArrayBase<S, Ix1>, grid: &RadialGrid) -> f64
where S: nd::Data<Elem = C64>
{
    let integrand: nd::Array1<f64>
        = q.iter().enumerate()
        .map(|(i, qi)| 4.0 * PI * grid.r(i).powi(2) * qi.norm_sqr())
        .collect();
    trapz(&integrand, grid.dr())
}
