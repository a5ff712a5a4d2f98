//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Free solution](#free-solution)
//! - [Observables](#observables)
//! - [Units](#units)
//!
//! # Background
//! The Schrödinger–Newton equation couples a single-particle wavefunction to
//! the Newtonian potential sourced by its own mass density,
//! ```text
//!    ∂ψ       ħ²                  ⌠  |ψ(t, y)|²
//! iħ -- = - --- ∇²ψ - G m² ψ(t, x) |  ---------- d³y
//!    ∂t      2m                   ⌡   |x - y|
//! ```
//! For a spherically symmetric state only the radial profile ψ(*t*, *r*)
//! matters. The simulator evolves such a profile on a grid *r*\[*i*\] = *i*
//! *δr* and saves it every few time steps; this crate analyses the saved
//! output.
//!
//! For small masses the self-gravity is negligible and the packet disperses
//! like a free particle. Above some mass the attraction slows (or even halts)
//! the dispersion. The question asked of each run is therefore: *when does
//! the simulated packet first become measurably narrower (or wider) than the
//! free one?*
//!
//! # Free solution
//! Without the potential, a Gaussian of initial width *w*,
//! ```text
//!                 1                r²
//! ψ(0, r) = ------------ exp( - ----- )
//!           (√π w)^(3/2)         2 w²
//! ```
//! evolves as
//! ```text
//!              z^(3/2)          r² z                     1
//! ψ(t, r) = ------------ exp( - ---- ),    z = ---------------------
//!           (√π w)^(3/2)        2 w²           1 + i ħ t / (m w²)
//! ```
//! Its density |ψ|² stays Gaussian with width *w* √(1 + *a*²), *a* = *ħt* /
//! (*m w*²), and the norm under 4π *r*² d*r* stays 1. See
//! [`free`][crate::free].
//!
//! # Observables
//! Three scalars characterize the width of a radial packet:
//! - the half-width index, the first grid point at which |ψ|² falls below
//!   half its maximum;
//! - *r*<sub>90</sub>, the radius enclosing 90% of the radial density
//!   (*r* |ψ|)²;
//! - *r*<sub>max</sub>, the radius at which the radial density peaks.
//!
//! For the initial Gaussian, *r*<sub>max</sub> = *w* and *r*<sub>90</sub> ≈
//! 1.76796 *w*; both grow by the factor √(1 + *a*²) under free evolution. The
//! phase of ψ is also of interest, since the free solution develops a
//! quadratic radial chirp that self-gravity partially undoes. See
//! [`observe`][crate::observe].
//!
//! The deviation scan ([`scan`][crate::scan]) compares half-widths because
//! they need no normalization and are insensitive to the far tail of the
//! packet, where numerical boundary effects live.
//!
//! # Units
//! The simulator writes lengths in nanometers, times in nanoseconds, and
//! masses in unified atomic mass units. In these units
//! ```text
//! ħ / u ≈ 63.5078 nm² ns⁻¹
//! ```
//! which is the only physical constant entering the free solution. See
//! [`units`][crate::units].
