//! Scalar and array observables derived from a single radial wavefunction.
//!
//! Two densities appear here:
//! - the *density* |ψ|², peaked at the origin for the packets of interest;
//! - the *radial density* (r |ψ|)², proportional to the probability of
//!   finding the particle in the shell at radius r.
//!
//! All functions are pure and total over finite input; none of them check for
//! NaN, which is the job of the loader.

use std::f64::consts::PI;
use ndarray::{ self as nd, Ix1 };
use num_complex::Complex64 as C64;
use crate::grid::RadialGrid;

/// Fraction of the radial density enclosed by [`r90`].
pub const R90_FRACTION: f64 = 0.9;

/// Compute the density |ψ|².
pub fn density<S>(q: &nd::ArrayBase<S, Ix1>) -> nd::Array1<f64>
where S: nd::Data<Elem = C64>
{
    q.mapv(|qk| qk.norm_sqr())
}

/// Compute the radial density (r |ψ|)².
pub fn radial_density<S>(q: &nd::ArrayBase<S, Ix1>, grid: &RadialGrid)
    -> nd::Array1<f64>
where S: nd::Data<Elem = C64>
{
    q.iter().enumerate()
        .map(|(i, qi)| (qi.norm() * grid.r(i)).powi(2))
        .collect()
}

/// Return the first grid index at which the density drops below half its
/// maximum.
///
/// `None` means the density never falls that far inside the grid; the packet
/// is too wide to measure. No monotonicity is assumed: the *first* crossing is
/// returned even if the density rises again further out.
///
/// ```
/// use ndarray as nd;
/// use num_complex::Complex64 as C64;
/// use sndisp::observe::half_width;
///
/// let q: nd::Array1<C64> = nd::array![1.0, 0.9, 0.6, 0.3].mapv(C64::from);
/// assert_eq!(half_width(&q), Some(2));
/// ```
pub fn half_width<S>(q: &nd::ArrayBase<S, Ix1>) -> Option<usize>
where S: nd::Data<Elem = C64>
{
    let rho = density(q);
    let max = rho.iter().copied().fold(0.0, f64::max);
    rho.iter().position(|&rk| rk < max / 2.0)
}

/// Return the radius within which [`R90_FRACTION`] of the radial density is
/// contained.
///
/// The cumulative sum is taken over grid points; if rounding keeps it short of
/// the target the result saturates at the outermost radius. A wavefunction
/// with no radial weight at all gives zero.
pub fn r90<S>(q: &nd::ArrayBase<S, Ix1>, grid: &RadialGrid) -> f64
where S: nd::Data<Elem = C64>
{
    let rho = radial_density(q, grid);
    let total: f64 = rho.sum();
    if !(total > 0.0) { return 0.0; }
    let mut acc: f64 = 0.0;
    let idx
        = rho.iter()
        .position(|&rk| { acc += rk / total; acc >= R90_FRACTION })
        .unwrap_or(rho.len().saturating_sub(1));
    grid.r(idx.min(grid.len() - 1))
}

/// Return the radius at which the radial density peaks.
///
/// Ties resolve to the innermost point.
pub fn rmax<S>(q: &nd::ArrayBase<S, Ix1>, grid: &RadialGrid) -> f64
where S: nd::Data<Elem = C64>
{
    let rho = radial_density(q, grid);
    let (idx, _)
        = rho.iter().enumerate()
        .fold((0, f64::NEG_INFINITY), |(imax, max), (i, &rk)| {
            if rk > max { (i, rk) } else { (imax, max) }
        });
    grid.r(idx)
}

/// Return the phase of each amplitude, in the interval (-π, π].
///
/// Negative real amplitudes map to +π regardless of the sign of their zero
/// imaginary part, and zero amplitudes map to 0.
pub fn phase<S>(q: &nd::ArrayBase<S, Ix1>) -> nd::Array1<f64>
where S: nd::Data<Elem = C64>
{
    q.mapv(|qk| {
        if qk.re == 0.0 && qk.im == 0.0 { return 0.0; }
        let arg = qk.arg();
        if arg <= -PI { PI } else { arg }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn real(v: &[f64]) -> nd::Array1<C64> {
        v.iter().map(|&x| C64::from(x)).collect()
    }

    #[test]
    fn half_width_first_crossing() {
        let q = real(&[1.0, 0.8, 0.75, 0.5, 0.9, 0.1]);
        // 0.5² < 1/2 first happens at index 3, even though index 4 rises again
        assert_eq!(half_width(&q), Some(3));
    }

    #[test]
    fn half_width_undefined_when_never_dropping() {
        assert_eq!(half_width(&real(&[1.0, 1.0, 0.9, 0.75])), None);
        assert_eq!(half_width(&real(&[0.0, 0.0])), None);
    }

    #[test]
    fn half_width_scale_invariant() {
        let q: nd::Array1<C64>
            = (0..200).map(|i| C64::from((-(i as f64 / 40.0).powi(2)).exp()))
            .collect();
        let hw = half_width(&q);
        assert!(hw.is_some());
        for c in [C64::new(2.0, 0.0), C64::new(0.0, -1e-3), C64::new(1e5, 3e5)] {
            assert_eq!(half_width(&q.mapv(|qk| c * qk)), hw);
        }
    }

    #[test]
    fn rmax_finds_planted_peak() {
        let grid = RadialGrid::new(8, 0.25).unwrap();
        // radial density: 0, 0.0625, 0.0625, 0.5625, 0.25, ...
        let q = real(&[3.0, 1.0, 0.5, 1.0, 0.5, 0.1, 0.1, 0.1]);
        assert_eq!(rmax(&q, &grid), grid.r(3));
    }

    #[test]
    fn rmax_ties_go_inward() {
        let grid = RadialGrid::new(4, 1.0).unwrap();
        // (r |ψ|)² = 0, 4, 4, 1
        let q = real(&[1.0, 2.0, 1.0, 1.0 / 3.0]);
        assert_eq!(rmax(&q, &grid), 1.0);
    }

    #[test]
    fn r90_crossing_index() {
        let grid = RadialGrid::new(5, 0.5).unwrap();
        // equal radial weights past the origin → cumulative 0.25, 0.5, 0.75, 1.0
        let q = real(&[1.0, 1.0, 0.5, 1.0 / 3.0, 0.25]);
        assert_relative_eq!(r90(&q, &grid), 2.0);
        // weights 0, 0, 0, 2.25, 0.25 → 0.9 reached exactly at index 3
        let q = real(&[0.0, 0.0, 0.0, 1.0, 0.25]);
        assert_relative_eq!(r90(&q, &grid), 1.5);
    }

    #[test]
    fn r90_stays_on_grid() {
        let grid = RadialGrid::new(50, 0.1).unwrap();
        let cases = [
            nd::Array1::from_elem(50, C64::new(1.0, 1.0)),
            nd::Array1::zeros(50),
            (0..50).map(|i| C64::from(if i == 49 { 1.0 } else { 0.0 })).collect(),
            (0..50).map(|i| C64::new(0.0, (i as f64).sin())).collect(),
        ];
        for q in cases.iter() {
            let r = r90(q, &grid);
            assert!((0.0..=grid.r_last()).contains(&r), "{r}");
        }
        assert_eq!(r90(&cases[1], &grid), 0.0);
        assert_relative_eq!(r90(&cases[2], &grid), grid.r_last());
    }

    #[test]
    fn phase_conventions() {
        let q = nd::array![
            C64::new(2.0, 0.0),
            C64::new(-2.0, 0.0),
            C64::new(-2.0, -0.0),
            C64::new(0.0, 1.0),
            C64::new(0.0, 0.0),
            C64::new(-0.0, -0.0),
            C64::new(1.0, -1.0),
        ];
        let p = phase(&q);
        assert_eq!(p.len(), q.len());
        assert_eq!(p[0], 0.0);
        assert_eq!(p[1], PI);
        assert_eq!(p[2], PI);
        assert_relative_eq!(p[3], PI / 2.0);
        assert_eq!(p[4], 0.0);
        assert_eq!(p[5], 0.0);
        assert_relative_eq!(p[6], -PI / 4.0);
    }

    #[test]
    fn densities() {
        let grid = RadialGrid::new(3, 2.0).unwrap();
        let q = nd::array![C64::new(3.0, 4.0), C64::new(0.0, 1.0), C64::new(-1.0, 0.0)];
        assert_eq!(density(&q), nd::array![25.0, 1.0, 1.0]);
        assert_eq!(radial_density(&q, &grid), nd::array![0.0, 4.0, 16.0]);
    }
}
