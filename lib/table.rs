//! Plain-text, two-column output tables.
//!
//! Every row holds two tab-separated values in C `%e` notation:
//! ```text
//! 0.000000e+00	1.234560e-07
//! 6.000000e-01	1.234110e-07
//! ...
//! ```
//! Tables are never overwritten: opening a table at a path that already exists
//! fails with [`TableError::Exists`].

use std::{
    fs,
    io::{ self, BufWriter, Write },
    path::{ Path, PathBuf },
};
use ndarray::{ self as nd, Ix1 };
use num_complex::Complex64 as C64;
use tracing::debug;
use crate::{
    error::{ LengthError, TableError },
    grid::RadialGrid,
    observe::{ phase, radial_density },
};

pub type TResult<T> = Result<T, TableError>;

/// Format a number like C's `%e`: six decimals and a signed, at least
/// two-digit exponent.
///
/// ```
/// assert_eq!(sndisp::table::sci(-1234.5), "-1.234500e+03");
/// ```
pub fn sci(x: f64) -> String {
    if x.is_nan() { return "nan".to_string(); }
    if x.is_infinite() {
        return if x > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let s = format!("{:.6e}", x);
    match s.split_once('e') {
        Some((mant, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mant, sign, exp.abs())
        },
        None => s,
    }
}

/// Fail with [`TableError::Exists`] if `path` already exists.
///
/// Drivers call this for every output before doing any work.
pub fn check_absent<P>(path: P) -> TResult<()>
where P: AsRef<Path>
{
    let path = path.as_ref();
    if path.exists() { return Err(TableError::Exists(path.to_path_buf())); }
    Ok(())
}

/// Row-by-row writer for a two-column table.
#[derive(Debug)]
pub struct TableWriter {
    path: PathBuf,
    out: BufWriter<fs::File>,
    rows: usize,
}

impl TableWriter {
    /// Create a new table at `path`, which must not exist yet.
    pub fn create<P>(path: P) -> TResult<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref().to_path_buf();
        let file
            = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| {
                if source.kind() == io::ErrorKind::AlreadyExists {
                    TableError::Exists(path.clone())
                } else {
                    TableError::Io { path: path.clone(), source }
                }
            })?;
        Ok(Self { path, out: BufWriter::new(file), rows: 0 })
    }

    /// Append a single row.
    pub fn row(&mut self, x: f64, y: f64) -> TResult<()> {
        writeln!(self.out, "{}\t{}", sci(x), sci(y))
            .map_err(|source| TableError::Io { path: self.path.clone(), source })?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and close the table, returning the number of rows written.
    pub fn finish(mut self) -> TResult<usize> {
        self.out.flush()
            .map_err(|source| TableError::Io { path: self.path.clone(), source })?;
        debug!(path = %self.path.display(), rows = self.rows, "wrote table");
        Ok(self.rows)
    }
}

/// Write two equal-length columns as a table.
pub fn write_columns<P, S, T>(
    path: P,
    x: &nd::ArrayBase<S, Ix1>,
    y: &nd::ArrayBase<T, Ix1>,
) -> TResult<usize>
where
    P: AsRef<Path>,
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    LengthError::check(x, y)?;
    let mut table = TableWriter::create(path)?;
    x.iter().zip(y).try_for_each(|(xk, yk)| table.row(*xk, *yk))?;
    table.finish()
}

/// Write the radial density (r |ψ|)² against r.
pub fn write_density_table<P, S>(
    path: P,
    q: &nd::ArrayBase<S, Ix1>,
    grid: &RadialGrid,
) -> TResult<usize>
where
    P: AsRef<Path>,
    S: nd::Data<Elem = C64>,
{
    let r = grid.radii();
    write_columns(path, &r, &radial_density(q, grid))
}

/// Write the phase of ψ against r.
pub fn write_phase_table<P, S>(
    path: P,
    q: &nd::ArrayBase<S, Ix1>,
    grid: &RadialGrid,
) -> TResult<usize>
where
    P: AsRef<Path>,
    S: nd::Data<Elem = C64>,
{
    let r = grid.radii();
    write_columns(path, &r, &phase(q))
}
