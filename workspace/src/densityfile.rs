use std::path::PathBuf;
use lib::{ init_logging, Run };
use sndisp::{
    snapshot::IntegrityPolicy,
    table::{ check_absent, write_density_table },
};
use tracing::info;

const LOCATION: &str = "/tmp/test";
const PREFIX: &str = "density"; // output files are <PREFIX><t>
const TIMES: &[u64] = &[1, 5, 10, 20]; // in units of save_every
const POLICY: IntegrityPolicy = IntegrityPolicy::Surface;

fn outfile(t: u64) -> PathBuf { PathBuf::from(format!("{}{}", PREFIX, t)) }

fn main() -> anyhow::Result<()> {
    init_logging();
    let run = Run::open(LOCATION, POLICY)?;
    let grid = run.params.grid()?;
    TIMES.iter().try_for_each(|t| check_absent(outfile(*t)))?;
    for &t in TIMES.iter() {
        let snap = run.store.load_one(t, run.params.save_every)?;
        let rows = write_density_table(outfile(t), &snap.psi, &grid)?;
        info!(t, step = snap.step, rows, "wrote density");
    }
    Ok(())
}
