//! Provides functions and higher-level constructs for analysing the output of
//! a radial Schrödinger–Newton simulation: a spherically symmetric
//! wavefunction evolving under its own gravitational potential, saved to disk
//! every few time steps.
//!
//! Provides implementations for the following:
//! - Input:
//!     - Extended-precision snapshot decoding (and encoding)
//!     - Run parameters from the simulator's settings log
//! - Analysis:
//!     - Exact free (non-gravitating) Gaussian reference solution
//!     - Density, half-width, *r*<sub>90</sub>, *r*<sub>max</sub>, and phase
//!     - Scan for the first departure from the free solution
//!     - *r*<sub>90</sub> and *r*<sub>max</sub> time series
//! - Output:
//!     - Two-column, never-overwritten text tables
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod ext80;
pub mod free;
pub mod grid;
pub mod observe;
pub mod params;
pub mod scan;
pub mod snapshot;
pub mod table;
pub mod track;
pub mod units;
pub mod utils;

pub mod docs;
