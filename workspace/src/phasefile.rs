use std::path::PathBuf;
use anyhow::Context;
use lib::{ init_logging, Run };
use sndisp::{
    snapshot::IntegrityPolicy,
    table::{ check_absent, write_phase_table },
};
use tracing::info;

const LOCATION: &str = "/tmp/test";
const PREFIX: &str = "phase"; // output files are <PREFIX><t> and <PREFIX><t>_free
const TIMES: &[u64] = &[5, 10, 20]; // in units of save_every
const POLICY: IntegrityPolicy = IntegrityPolicy::Surface;

fn outfiles(t: u64) -> (PathBuf, PathBuf) {
    (
        PathBuf::from(format!("{}{}", PREFIX, t)),
        PathBuf::from(format!("{}{}_free", PREFIX, t)),
    )
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let run = Run::open(LOCATION, POLICY)?;
    let grid = run.params.grid()?;
    let free
        = run.params.free_params()
        .context("phase comparison needs a gaussian initial state")?;
    for &t in TIMES.iter() {
        let (sim, fr) = outfiles(t);
        check_absent(&sim)?;
        check_absent(&fr)?;
    }
    for &t in TIMES.iter() {
        let (sim, fr) = outfiles(t);
        let snap = run.store.load_one(t, run.params.save_every)?;
        let time = snap.step as f64 * run.params.dt;
        write_phase_table(&sim, &snap.psi, &grid)?;
        write_phase_table(&fr, &free.evaluate(time, &grid), &grid)?;
        info!(t, step = snap.step, time, "wrote phases");
    }
    Ok(())
}
