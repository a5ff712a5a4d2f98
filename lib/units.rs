#![allow(non_upper_case_globals)]

//! Physical constants and the unit system of the simulation output.
//!
//! The simulator works in nanometers, nanoseconds and unified atomic mass
//! units; every length, time and mass handed to this crate is assumed to be
//! expressed in those units.
//!
//! Concrete physical constants are taken from NIST.

use std::f64::consts::PI;

/// Planck constant (kg m^2 s^-1)
pub const h: f64 = 6.62607015e-34;
//             +/- 0 (exact)

/// reduced Planck constant (kg m^2 s^-1)
pub const hbar: f64 = h / 2.0 / PI;
//                +/- 0 (exact)

/// unified atomic mass unit (kg)
pub const mu: f64 = 1.66053906660e-27;
//              +/- 0.00000000050e-27

/// Simulation length unit (m).
pub const NANOMETER: f64 = 1e-9;

/// Simulation time unit (s).
pub const NANOSECOND: f64 = 1e-9;

/// Simulation mass unit (kg).
pub const DALTON: f64 = mu;

/// ħ / u in nm² ns⁻¹, the dispersion constant of the free solution.
///
/// Kept as the literal used by the simulation scripts; it agrees with
/// [`hbar_over_mu`] to about one part in 10⁸.
pub const K_DISPERSION: f64 = 63.50779875974;

/// ħ / u in nm² ns⁻¹ derived from the CODATA constants above.
pub fn hbar_over_mu() -> f64 {
    hbar / DALTON * NANOSECOND / NANOMETER.powi(2)
}

/// Convert a simulation time (ns) to seconds.
pub fn ns_to_s(t: f64) -> f64 { t * NANOSECOND }
