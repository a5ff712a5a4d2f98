//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use std::{ io, path::PathBuf };
use ndarray as nd;
use thiserror::Error;
use crate::free::FreeParams;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned when a radial grid would be empty or have a degenerate step.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid must have at least one point")]
    Empty,

    #[error("grid step must be positive and finite; got {0}")]
    BadStep(f64),
}

/// Returned from [`snapshot`][crate::snapshot] functions.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Returned when the data location (or its `data/` subdirectory) does not
    /// exist when a store is opened.
    #[error("input path does not exist: {0}")]
    MissingInput(PathBuf),

    /// Returned when the file backing a requested time step does not exist.
    #[error("missing snapshot for step {step}: {path}")]
    Missing { step: u64, path: PathBuf },

    /// Returned when a snapshot file holds a different number of amplitudes
    /// than the grid.
    #[error("snapshot {path} has {got} bytes; expected {expected} ({n} points)")]
    Length { path: PathBuf, n: usize, expected: u64, got: u64 },

    /// Returned when a snapshot contains a NaN or infinite amplitude.
    #[error("non-finite amplitude in snapshot {path} at grid index {index}")]
    Integrity { path: PathBuf, index: usize },

    /// Returned when a series is requested with a save stride of zero.
    #[error("save stride must be greater than 0")]
    BadStride,

    /// Returned when a snapshot to be saved does not match the grid size.
    #[error("snapshot length error: {0}")]
    Shape(#[from] LengthError),

    /// Any other I/O failure, along with the offending path.
    #[error("i/o error at {path}: {source}")]
    Io { path: PathBuf, #[source] source: io::Error },
}

impl SnapshotError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn check_stride(save_every: u64) -> Result<(), Self> {
        (save_every != 0).then_some(()).ok_or(Self::BadStride)
    }
}

/// Returned from [`scan`][crate::scan] and [`track`][crate::track] functions.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Returned when a non-positive or non-finite deviation threshold is
    /// encountered.
    #[error("deviation threshold must be positive and finite; got {0}")]
    BadThreshold(f64),

    /// Returned when the free solution's width or mass is non-positive or
    /// non-finite.
    #[error("free solution needs positive, finite width and mass; got w = {w}, m = {m}")]
    BadFreeParams { w: f64, m: f64 },

    /// Returned when a loaded snapshot does not live on the scan's grid.
    #[error("snapshot length error: {0}")]
    Length(#[from] LengthError),

    /// [`SnapshotError`]
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl ScanError {
    pub(crate) fn check_threshold(err: f64) -> Result<(), Self> {
        (err > 0.0 && err.is_finite()).then_some(())
            .ok_or(Self::BadThreshold(err))
    }

    pub(crate) fn check_free(free: &FreeParams) -> Result<(), Self> {
        free.is_physical().then_some(())
            .ok_or(Self::BadFreeParams { w: free.w, m: free.m })
    }
}

/// Returned from [`params`][crate::params] functions.
#[derive(Debug, Error)]
pub enum ParamError {
    /// Returned when the settings log contains no settings block.
    #[error("no settings block found in {0}")]
    NoSettings(String),

    /// Returned when a required setting is absent from the final block.
    #[error("missing setting '{0}'")]
    Missing(&'static str),

    /// Returned when a setting's value cannot be parsed.
    #[error("bad value for setting '{key}': '{value}'")]
    BadValue { key: &'static str, value: String },

    /// Returned when a free-solution comparison is requested for a run that
    /// did not start from a Gaussian.
    #[error("free solution requires a gaussian initial state; run used '{0}'")]
    NotGaussian(char),

    /// [`GridError`]
    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("i/o error at {path}: {source}")]
    Io { path: PathBuf, #[source] source: io::Error },
}

/// Returned from [`table`][crate::table] functions.
#[derive(Debug, Error)]
pub enum TableError {
    /// Returned when an output file already exists; tables are never
    /// overwritten.
    #[error("output file exists: {0}")]
    Exists(PathBuf),

    /// Returned when the two columns of a table have different lengths.
    #[error("column length error: {0}")]
    Length(#[from] LengthError),

    #[error("i/o error at {path}: {source}")]
    Io { path: PathBuf, #[source] source: io::Error },
}
