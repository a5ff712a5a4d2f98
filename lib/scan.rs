//! Search for the first saved time step at which the simulated wavepacket's
//! half-width departs from that of the free solution.
//!
//! Each step is measured independently ([`DeviationScanner::measurements`]),
//! producing a lazy, chronological sequence of [`Measurement`]s; the scan
//! proper ([`DeviationScanner::scan`]) just consumes that sequence until the
//! first deviation above threshold. Snapshots are loaded one at a time and
//! nothing past the first crossing is ever read.

use std::fmt;
use ndarray as nd;
use num_complex::Complex64 as C64;
use tracing::{ debug, info, warn };
use crate::{
    error::{ LengthError, ScanError },
    free::FreeParams,
    grid::RadialGrid,
    observe::half_width,
    snapshot::{ series_steps, SeriesSteps, SnapshotSource },
    table::sci,
    units,
};

pub type ScanResult<T> = Result<T, ScanError>;

/// Everything a scan needs to know about the run it is looking at.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScanConfig {
    /// Radial grid of the simulation.
    pub grid: RadialGrid,
    /// Last simulation step to scan.
    pub max_t: u64,
    /// Number of simulation steps between saved snapshots.
    pub save_every: u64,
    /// Simulation time step (ns).
    pub dt: f64,
    /// Parameters of the free reference solution.
    pub free: FreeParams,
    /// Relative deviation threshold.
    pub err: f64,
}

impl ScanConfig {
    /// Physical time of an absolute step.
    pub fn time(&self, step: u64) -> f64 { step as f64 * self.dt }
}

/// Relative deviation of a simulated half-width from the free one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Deviation {
    /// `|1 - sim / free|`; infinite if the simulated packet is too wide to
    /// measure.
    Relative(f64),
    /// The free half-width is zero or too wide to measure, so no ratio can be
    /// formed.
    Undefined,
}

impl Deviation {
    /// Compare two half-widths.
    pub fn between(sim: Option<usize>, free: Option<usize>) -> Self {
        match (sim, free) {
            (_, None) | (_, Some(0)) => Self::Undefined,
            (None, Some(_)) => Self::Relative(f64::INFINITY),
            (Some(s), Some(f)) => Self::Relative((1.0 - s as f64 / f as f64).abs()),
        }
    }

    /// Return `true` if `self` is defined and strictly greater than `err`.
    pub fn exceeds(&self, err: f64) -> bool {
        matches!(self, Self::Relative(d) if *d > err)
    }
}

/// Half-widths and their deviation at a single saved step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Measurement {
    /// Absolute simulation step.
    pub step: u64,
    /// Physical time (ns).
    pub time: f64,
    /// Half-width index of the simulated wavefunction.
    pub sim_width: Option<usize>,
    /// Half-width index of the free solution.
    pub free_width: Option<usize>,
    pub deviation: Deviation,
}

/// Final result of a scan.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScanOutcome {
    /// First step at which the deviation exceeded the threshold.
    Found { mass: f64, time: f64, step: u64, deviation: f64 },
    /// At least one saved step was compared and none exceeded the threshold.
    Exhausted { compared: usize, skipped: usize },
    /// No saved step could be compared against the free solution.
    Inconclusive { skipped: usize },
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found { mass, time, .. } => {
                write!(f, "{} \t {}", sci(*mass), sci(units::ns_to_s(*time)))
            },
            Self::Exhausted { .. } => write!(f, "No difference to free solution"),
            Self::Inconclusive { skipped } => {
                write!(f, "No comparison with free solution ({} steps skipped)", skipped)
            },
        }
    }
}

/// Walks the saved steps of a run, comparing each against the free solution.
pub struct DeviationScanner<'a, S> {
    source: &'a S,
    config: ScanConfig,
    steps: SeriesSteps,
}

impl<'a, S> DeviationScanner<'a, S>
where S: SnapshotSource
{
    /// Create a new scanner, validating the threshold, the free-solution
    /// parameters, and the save stride.
    pub fn new(source: &'a S, config: ScanConfig) -> ScanResult<Self> {
        ScanError::check_threshold(config.err)?;
        ScanError::check_free(&config.free)?;
        let steps = series_steps(config.max_t, config.save_every)?;
        Ok(Self { source, config, steps })
    }

    pub fn config(&self) -> &ScanConfig { &self.config }

    /// Compare the simulated and free half-widths at a single step.
    pub fn measure(&self, step: u64) -> ScanResult<Measurement> {
        let time = self.config.time(step);
        let free: nd::Array1<C64> = self.config.free.evaluate(time, &self.config.grid);
        let snap = self.source.load_step(step)?;
        LengthError::check(&snap.psi, &free)?;
        let sim_width = half_width(&snap.psi);
        let free_width = half_width(&free);
        let deviation = Deviation::between(sim_width, free_width);
        debug!(step, time, ?sim_width, ?free_width, ?deviation, "measured step");
        Ok(Measurement { step, time, sim_width, free_width, deviation })
    }

    /// Lazily measure every saved step in chronological order.
    pub fn measurements(&self)
        -> impl Iterator<Item = ScanResult<Measurement>> + '_
    {
        self.steps.map(move |step| self.measure(step))
    }

    /// Find the first step whose deviation exceeds the threshold.
    ///
    /// Steps where the comparison is [undefined][Deviation::Undefined] are
    /// skipped with a warning; if every step is skipped the outcome is
    /// [`ScanOutcome::Inconclusive`]. Any load failure aborts the scan.
    pub fn scan(&self) -> ScanResult<ScanOutcome> {
        let err = self.config.err;
        let mut compared: usize = 0;
        let mut skipped: usize = 0;
        for measurement in self.measurements() {
            let Measurement { step, time, deviation, .. } = measurement?;
            match deviation {
                Deviation::Undefined => {
                    warn!(step, "free half-width undefined; skipping step");
                    skipped += 1;
                },
                Deviation::Relative(d) if deviation.exceeds(err) => {
                    info!(step, time, deviation = d, "deviation above threshold");
                    return Ok(ScanOutcome::Found {
                        mass: self.config.free.m,
                        time,
                        step,
                        deviation: d,
                    });
                },
                Deviation::Relative(_) => { compared += 1; },
            }
        }
        if compared == 0 {
            warn!(skipped, "no step could be compared with the free solution");
            Ok(ScanOutcome::Inconclusive { skipped })
        } else {
            info!(compared, skipped, "no deviation above threshold");
            Ok(ScanOutcome::Exhausted { compared, skipped })
        }
    }
}
