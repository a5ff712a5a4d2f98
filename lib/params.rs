//! Run parameters, as recorded by the simulator in `param.txt`.
//!
//! The simulator appends one settings block to `param.txt` every time a run is
//! started or continued:
//! ```text
//! *********************************
//!  SETTINGS FOR RUN @ 20230314-1102
//!  STARTING WITH t =              0
//! *********************************
//! width in nm:                  500
//! mass in u  :                5e+10
//! grid size  :                 5100
//! dr in nm   :                  0.6
//! dt in ns   :                1e+06
//! max. time  :             20000000
//! save every :                 1000
//! coupling   :                    1
//! wave funct.:                    g
//! movie cmd  : python movie.py ...
//! ```
//! The last block describes the data currently on disk.

use std::{ collections::HashMap, fs, path::Path, str::FromStr };
use crate::{
    error::ParamError,
    free::FreeParams,
    grid::RadialGrid,
    scan::ScanConfig,
    track::TrackConfig,
};

pub type PResult<T> = Result<T, ParamError>;

/// Name of the settings log inside a run directory.
pub const PARAM_FILE: &str = "param.txt";

const BLOCK_HEADER: &str = "SETTINGS FOR RUN";
const START_MARKER: &str = "STARTING WITH t =";

// settings a block must carry to be usable
const REQUIRED: [&str; 9] = [
    "width in nm",
    "mass in u",
    "grid size",
    "dr in nm",
    "dt in ns",
    "max. time",
    "save every",
    "coupling",
    "wave funct.",
];

/// Shape of the initial wavefunction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InitialWave {
    /// `g`
    Gaussian,
    /// `r`
    Rectangular,
    /// `e`; exponential with a hole in the middle
    Exponential,
}

impl InitialWave {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "g" => Some(Self::Gaussian),
            "r" => Some(Self::Rectangular),
            "e" => Some(Self::Exponential),
            _ => None,
        }
    }

    fn code(&self) -> char {
        match self {
            Self::Gaussian => 'g',
            Self::Rectangular => 'r',
            Self::Exponential => 'e',
        }
    }
}

/// Parameters of a single simulation run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RunParams {
    /// Initial width (nm).
    pub w: f64,
    /// Particle mass (u).
    pub m: f64,
    /// Number of grid points.
    pub n: usize,
    /// Grid spacing (nm).
    pub dr: f64,
    /// Time step (ns).
    pub dt: f64,
    /// Final step of the run.
    pub max_t: u64,
    /// Steps between saved snapshots.
    pub save_every: u64,
    /// Coupling constant of the gravitational potential.
    pub coupling: f64,
    pub wave_function: InitialWave,
    /// Step at which the (possibly continued) run started.
    pub start_t: u64,
}

fn get<T>(block: &HashMap<String, String>, key: &'static str) -> PResult<T>
where T: FromStr
{
    let value = block.get(key).ok_or(ParamError::Missing(key))?;
    value.parse()
        .map_err(|_| ParamError::BadValue { key, value: value.clone() })
}

// like `get`, but the value must also be positive and finite
fn get_positive(block: &HashMap<String, String>, key: &'static str) -> PResult<f64> {
    let value: f64 = get(block, key)?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ParamError::BadValue { key, value: value.to_string() })
    }
}

impl RunParams {
    /// Read the settings log at `path`.
    pub fn from_file<P>(path: P) -> PResult<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let text
            = fs::read_to_string(path)
            .map_err(|source| ParamError::Io { path: path.to_path_buf(), source })?;
        Self::parse_log(&text, &path.display().to_string())
    }

    /// Read `param.txt` from a run directory.
    pub fn from_run_dir<P>(location: P) -> PResult<Self>
    where P: AsRef<Path>
    {
        Self::from_file(location.as_ref().join(PARAM_FILE))
    }

    fn parse_log(text: &str, origin: &str) -> PResult<Self> {
        let mut blocks: Vec<HashMap<String, String>> = vec![HashMap::new()];
        for line in text.lines() {
            let line = line.trim();
            if line.contains(BLOCK_HEADER) {
                blocks.push(HashMap::new());
            } else if let Some(rest) = line.strip_prefix(START_MARKER) {
                if let Some(block) = blocks.last_mut() {
                    block.insert(START_MARKER.to_string(), rest.trim().to_string());
                }
            } else if let Some((key, value)) = line.split_once(':') {
                if let Some(block) = blocks.last_mut() {
                    block.insert(key.trim().to_string(), value.trim().to_string());
                }
            }
        }
        // an interrupted continuation can leave a partial block at the end;
        // fall back to the last complete one, or report on the last non-empty
        // one if there is none
        let block
            = blocks.iter().rev()
            .find(|block| REQUIRED.iter().all(|key| block.contains_key(*key)))
            .or_else(|| blocks.iter().rev().find(|block| !block.is_empty()))
            .ok_or_else(|| ParamError::NoSettings(origin.to_string()))?;
        let code: String = get(block, "wave funct.")?;
        let wave_function
            = InitialWave::from_code(&code)
            .ok_or(ParamError::BadValue { key: "wave funct.", value: code })?;
        let start_t
            = if block.contains_key(START_MARKER) { get(block, START_MARKER)? }
            else { 0 };
        Ok(Self {
            w: get_positive(block, "width in nm")?,
            m: get_positive(block, "mass in u")?,
            n: get(block, "grid size")?,
            dr: get(block, "dr in nm")?,
            dt: get(block, "dt in ns")?,
            max_t: get(block, "max. time")?,
            save_every: get(block, "save every")?,
            coupling: get(block, "coupling")?,
            wave_function,
            start_t,
        })
    }

    /// Radial grid of the run.
    pub fn grid(&self) -> PResult<RadialGrid> {
        Ok(RadialGrid::new(self.n, self.dr)?)
    }

    /// Parameters of the matching free solution; only Gaussian runs have one.
    pub fn free_params(&self) -> Option<FreeParams> {
        (self.wave_function == InitialWave::Gaussian)
            .then_some(FreeParams::new(self.w, self.m))
    }

    /// Build a tracking configuration for this run.
    pub fn track_config(&self) -> PResult<TrackConfig> {
        let free
            = self.free_params()
            .ok_or(ParamError::NotGaussian(self.wave_function.code()))?;
        Ok(TrackConfig {
            grid: self.grid()?,
            max_t: self.max_t,
            save_every: self.save_every,
            dt: self.dt,
            free,
        })
    }

    /// Build a scan configuration for this run with deviation threshold `err`.
    pub fn scan_config(&self, err: f64) -> PResult<ScanConfig> {
        let TrackConfig { grid, max_t, save_every, dt, free } = self.track_config()?;
        Ok(ScanConfig { grid, max_t, save_every, dt, free, err })
    }
}

impl FromStr for RunParams {
    type Err = ParamError;

    fn from_str(s: &str) -> PResult<Self> { Self::parse_log(s, "settings log") }
}
