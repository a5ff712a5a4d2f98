//! Time series of the radial observables [`r90`] and [`rmax`] over a run.
//!
//! The series always starts with the analytic value for the initial Gaussian
//! at *t* = 0, followed by one row per saved step. Times are reported in
//! seconds.

use ndarray as nd;
use num_complex::Complex64 as C64;
use tracing::debug;
use crate::{
    error::{ LengthError, ScanError },
    free::FreeParams,
    grid::RadialGrid,
    observe::{ r90, rmax },
    scan::ScanResult,
    snapshot::{ series_steps, SeriesSteps, SnapshotSource },
    units,
};

/// A radial observable that can be tracked over time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Observable {
    /// Radius enclosing 90% of the radial density.
    R90,
    /// Peak of the radial density.
    Rmax,
}

impl Observable {
    /// Evaluate the observable for a single wavefunction.
    pub fn of<S>(&self, q: &nd::ArrayBase<S, nd::Ix1>, grid: &RadialGrid) -> f64
    where S: nd::Data<Elem = C64>
    {
        match self {
            Self::R90 => r90(q, grid),
            Self::Rmax => rmax(q, grid),
        }
    }

    /// Analytic value for the initial Gaussian.
    pub fn initial(&self, free: &FreeParams) -> f64 {
        match self {
            Self::R90 => free.r90_initial(),
            Self::Rmax => free.rmax_initial(),
        }
    }

    /// Conventional output file name for the series.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::R90 => "r90.dat",
            Self::Rmax => "rmax.dat",
        }
    }
}

/// Everything a tracker needs to know about the run it is following.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrackConfig {
    /// Radial grid of the simulation.
    pub grid: RadialGrid,
    /// Last simulation step to track.
    pub max_t: u64,
    /// Number of simulation steps between saved snapshots.
    pub save_every: u64,
    /// Simulation time step (ns).
    pub dt: f64,
    /// Parameters of the initial Gaussian, for the row at *t* = 0.
    pub free: FreeParams,
}

impl TrackConfig {
    /// Physical time of an absolute step (ns).
    pub fn time(&self, step: u64) -> f64 { step as f64 * self.dt }
}

/// Produces `(time, value)` rows for an observable, loading one snapshot at a
/// time.
pub struct ObservableTracker<'a, S> {
    source: &'a S,
    observable: Observable,
    config: TrackConfig,
    steps: SeriesSteps,
}

impl<'a, S> ObservableTracker<'a, S>
where S: SnapshotSource
{
    pub fn new(source: &'a S, observable: Observable, config: TrackConfig)
        -> ScanResult<Self>
    {
        ScanError::check_free(&config.free)?;
        let steps = series_steps(config.max_t, config.save_every)?;
        Ok(Self { source, observable, config, steps })
    }

    // value of the observable at an absolute step
    fn measure(&self, step: u64) -> ScanResult<(f64, f64)> {
        let snap = self.source.load_step(step)?;
        if snap.psi.len() != self.config.grid.len() {
            return Err(LengthError(snap.psi.len(), self.config.grid.len()).into());
        }
        let time = units::ns_to_s(self.config.time(step));
        let value = self.observable.of(&snap.psi, &self.config.grid);
        debug!(step, time, value, observable = ?self.observable, "tracked step");
        Ok((time, value))
    }

    /// Lazily produce all rows, starting with the analytic one at *t* = 0.
    pub fn rows(&self) -> impl Iterator<Item = ScanResult<(f64, f64)>> + '_ {
        let initial = (0.0, self.observable.initial(&self.config.free));
        std::iter::once(Ok(initial))
            .chain(self.steps.map(move |step| self.measure(step)))
    }

    /// Collect all rows, failing on the first load error.
    pub fn collect(&self) -> Result<Vec<(f64, f64)>, ScanError> {
        self.rows().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::{
        error::SnapshotError,
        snapshot::{ SResult, Snapshot },
        units::K_DISPERSION,
    };

    struct Free(TrackConfig);

    impl SnapshotSource for Free {
        fn load_step(&self, step: u64) -> SResult<Snapshot> {
            if step > 5000 {
                return Err(SnapshotError::Missing { step, path: "gone".into() });
            }
            Ok(Snapshot::new(step, self.0.free.evaluate(self.0.time(step), &self.0.grid)))
        }
    }

    fn config(max_t: u64) -> TrackConfig {
        TrackConfig {
            grid: RadialGrid::new(5000, 0.002).unwrap(),
            max_t,
            save_every: 1000,
            dt: 1e-3 / K_DISPERSION,
            free: FreeParams::new(1.0, 1.0),
        }
    }

    #[test]
    fn rows_start_with_analytic_value() {
        let cfg = config(2500);
        let source = Free(cfg);
        let rows = ObservableTracker::new(&source, Observable::Rmax, cfg).unwrap()
            .collect().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], (0.0, 1.0));
        let times: Vec<f64> = rows.iter().map(|r| r.0).collect();
        assert_relative_eq!(times[3], units::ns_to_s(2500.0 * cfg.dt));
    }

    #[test]
    fn free_packet_spreads() {
        // the radial peak of a free packet sits at w √(1 + a²), a = ħ t / m w²
        let cfg = config(4000);
        let source = Free(cfg);
        let rows = ObservableTracker::new(&source, Observable::Rmax, cfg).unwrap()
            .collect().unwrap();
        for (&(_, r), step) in rows.iter().skip(1).zip([1000.0, 2000.0, 3000.0, 4000.0]) {
            let a: f64 = step * 1e-3;
            assert_relative_eq!(r, (1.0 + a * a).sqrt(), epsilon = 3e-3);
        }
        let r90s = ObservableTracker::new(&source, Observable::R90, cfg).unwrap()
            .collect().unwrap();
        assert!(r90s.windows(2).all(|w| w[0].1 < w[1].1));
    }

    #[test]
    fn stops_on_missing_snapshot() {
        let cfg = config(8000);
        let source = Free(cfg);
        let tracker = ObservableTracker::new(&source, Observable::R90, cfg).unwrap();
        assert_eq!(tracker.rows().take_while(|r| r.is_ok()).count(), 6);
        assert!(matches!(
            tracker.collect(),
            Err(ScanError::Snapshot(SnapshotError::Missing { step: 6000, .. }))
        ));
    }

    #[test]
    fn rejects_unphysical_initial_state() {
        let cfg = TrackConfig { free: FreeParams::new(1.0, 0.0), ..config(1000) };
        let source = Free(config(1000));
        assert!(matches!(
            ObservableTracker::new(&source, Observable::R90, cfg),
            Err(ScanError::BadFreeParams { .. })
        ));
    }

    #[test]
    fn file_names() {
        assert_eq!(Observable::R90.file_name(), "r90.dat");
        assert_eq!(Observable::Rmax.file_name(), "rmax.dat");
    }
}
