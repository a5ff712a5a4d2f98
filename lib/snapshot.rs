//! Loading (and saving) persisted wavefunction snapshots.
//!
//! A simulation run lives in a directory whose `data/` subdirectory holds one
//! file per saved time step, named `w<step>.dat` with the absolute step number
//! zero-padded to 14 digits. Each file is a flat dump of `n` complex amplitudes
//! in the [extended-precision format][crate::ext80]; there is no header, so
//! `n` must be known in advance.
//!
//! Snapshots are saved every `save_every` steps, plus once more at the final
//! step if the run length is not a multiple of `save_every` (see
//! [`series_steps`]).

use std::{
    fs,
    io::{ self, BufWriter, Write },
    path::{ Path, PathBuf },
};
use ndarray as nd;
use num_complex::Complex64 as C64;
use tracing::{ debug, warn };
use crate::{
    error::{ LengthError, SnapshotError },
    ext80::{ self, COMPLEX_SIZE },
};

pub type SResult<T> = Result<T, SnapshotError>;

/// Name of the subdirectory holding snapshot files.
pub const DATA_DIR: &str = "data";

/// A single wavefunction at an absolute simulation step.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Absolute step number (count of elementary time steps).
    pub step: u64,
    /// Amplitudes, one per grid point.
    pub psi: nd::Array1<C64>,
}

impl Snapshot {
    pub fn new(step: u64, psi: nd::Array1<C64>) -> Self { Self { step, psi } }
}

/// What to do when a loaded snapshot contains a NaN or infinite amplitude.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum IntegrityPolicy {
    /// Fail with [`SnapshotError::Integrity`].
    #[default]
    Surface,
    /// Log a warning and hand back the snapshot anyway.
    Warn,
}

/// Anything that can produce the snapshot for an absolute step.
pub trait SnapshotSource {
    fn load_step(&self, step: u64) -> SResult<Snapshot>;
}

/// Return the file name of the snapshot for an absolute step.
pub fn snapshot_file_name(step: u64) -> String { format!("w{:014}.dat", step) }

/// Iterator over the absolute steps at which snapshots were saved.
///
/// See [`series_steps`].
#[derive(Copy, Clone, Debug)]
pub struct SeriesSteps {
    last: u64,
    max_t: u64,
    save_every: u64,
}

impl Iterator for SeriesSteps {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.last >= self.max_t { return None; }
        let step = self.last.saturating_add(self.save_every).min(self.max_t);
        self.last = step;
        Some(step)
    }
}

/// Enumerate the saved steps `save_every, 2 save_every, ...` up to `max_t`,
/// finishing with `max_t` itself if it is not a multiple of `save_every`.
///
/// ```
/// use sndisp::snapshot::series_steps;
///
/// let steps: Vec<u64> = series_steps(1000, 300).unwrap().collect();
/// assert_eq!(steps, vec![300, 600, 900, 1000]);
/// ```
pub fn series_steps(max_t: u64, save_every: u64) -> SResult<SeriesSteps> {
    SnapshotError::check_stride(save_every)?;
    Ok(SeriesSteps { last: 0, max_t, save_every })
}

/// File-backed snapshot access for a single simulation run.
#[derive(Clone, Debug)]
pub struct SnapshotStore {
    root: PathBuf,
    n: usize,
    policy: IntegrityPolicy,
}

impl SnapshotStore {
    /// Open the run stored at `location`, whose snapshots hold `n` amplitudes.
    ///
    /// Fails if `location/data` does not exist.
    pub fn open<P>(location: P, n: usize) -> SResult<Self>
    where P: AsRef<Path>
    {
        let root = location.as_ref().to_path_buf();
        let data = root.join(DATA_DIR);
        if !data.is_dir() { return Err(SnapshotError::MissingInput(data)); }
        Ok(Self { root, n, policy: IntegrityPolicy::default() })
    }

    /// Like [`Self::open`], but create `location/data` if necessary.
    pub fn create<P>(location: P, n: usize) -> SResult<Self>
    where P: AsRef<Path>
    {
        let data = location.as_ref().join(DATA_DIR);
        fs::create_dir_all(&data).map_err(SnapshotError::io(&data))?;
        Self::open(location, n)
    }

    /// Set the policy for non-finite amplitudes.
    pub fn with_policy(mut self, policy: IntegrityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Directory of the run.
    pub fn location(&self) -> &Path { &self.root }

    /// Number of amplitudes per snapshot.
    pub fn n(&self) -> usize { self.n }

    /// Full path of the snapshot file for an absolute step.
    pub fn path_for(&self, step: u64) -> PathBuf {
        self.root.join(DATA_DIR).join(snapshot_file_name(step))
    }

    /// Load the snapshot at absolute step `t * save_every`.
    pub fn load_one(&self, t: u64, save_every: u64) -> SResult<Snapshot> {
        self.load(t.saturating_mul(save_every))
    }

    /// Load the snapshot at an absolute step.
    pub fn load(&self, step: u64) -> SResult<Snapshot> {
        let path = self.path_for(step);
        let bytes
            = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(SnapshotError::Missing { step, path });
                },
                Err(e) => { return Err(SnapshotError::io(path)(e)); },
            };
        let expected = (self.n * COMPLEX_SIZE) as u64;
        if bytes.len() as u64 != expected {
            return Err(SnapshotError::Length {
                path,
                n: self.n,
                expected,
                got: bytes.len() as u64,
            });
        }
        let psi: nd::Array1<C64>
            = bytes.chunks_exact(COMPLEX_SIZE)
            .map(|chunk| {
                let mut rec = [0_u8; COMPLEX_SIZE];
                rec.copy_from_slice(chunk);
                ext80::decode_complex(&rec)
            })
            .collect();
        self.check_integrity(&path, &psi)?;
        debug!(step, path = %path.display(), "loaded snapshot");
        Ok(Snapshot { step, psi })
    }

    fn check_integrity(&self, path: &Path, psi: &nd::Array1<C64>) -> SResult<()> {
        let bad = psi.iter().position(|z| !(z.re.is_finite() && z.im.is_finite()));
        match (bad, self.policy) {
            (None, _) => Ok(()),
            (Some(index), IntegrityPolicy::Surface) => {
                Err(SnapshotError::Integrity { path: path.to_path_buf(), index })
            },
            (Some(index), IntegrityPolicy::Warn) => {
                warn!(
                    path = %path.display(),
                    index,
                    "non-finite amplitude in snapshot; continuing"
                );
                Ok(())
            },
        }
    }

    /// Lazily load the series of snapshots up to `max_t`, one at a time.
    pub fn iter_series(&self, max_t: u64, save_every: u64)
        -> SResult<impl Iterator<Item = SResult<Snapshot>> + '_>
    {
        Ok(series_steps(max_t, save_every)?.map(move |step| self.load(step)))
    }

    /// Load the entire series of snapshots up to `max_t` into memory.
    pub fn load_series(&self, max_t: u64, save_every: u64)
        -> SResult<Vec<Snapshot>>
    {
        self.iter_series(max_t, save_every)?.collect()
    }

    /// Write a snapshot in the simulator's format, replacing any existing file
    /// for the same step.
    pub fn save(&self, snapshot: &Snapshot) -> SResult<()> {
        if snapshot.psi.len() != self.n {
            return Err(LengthError(snapshot.psi.len(), self.n).into());
        }
        let path = self.path_for(snapshot.step);
        let file = fs::File::create(&path).map_err(SnapshotError::io(&path))?;
        let mut out = BufWriter::new(file);
        snapshot.psi.iter()
            .try_for_each(|z| out.write_all(&ext80::encode_complex(*z)))
            .and_then(|_| out.flush())
            .map_err(SnapshotError::io(&path))?;
        debug!(step = snapshot.step, path = %path.display(), "saved snapshot");
        Ok(())
    }
}

impl SnapshotSource for SnapshotStore {
    fn load_step(&self, step: u64) -> SResult<Snapshot> { self.load(step) }
}
