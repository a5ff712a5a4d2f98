//! End-to-end runs over a simulation directory written to a temporary
//! location: settings log, snapshot files, scan, and tables.

use std::{ fs, path::Path };
use approx::assert_relative_eq;
use sndisp::{
    error::{ ParamError, ScanError, SnapshotError, TableError },
    free::FreeParams,
    params::{ RunParams, PARAM_FILE },
    scan::{ DeviationScanner, ScanOutcome },
    snapshot::{ IntegrityPolicy, Snapshot, SnapshotStore },
    table::{ check_absent, sci, TableWriter },
    track::{ Observable, ObservableTracker },
    units::{ self, K_DISPERSION },
};
use tempfile::TempDir;

const W: f64 = 1.0;
const M: f64 = 1.0;
const N: usize = 400;
const DR: f64 = 0.02;
const MAX_T: u64 = 5000;
const SAVE_EVERY: u64 = 1000;

fn dt() -> f64 { 1.0e-4 / K_DISPERSION }

fn write_params(location: &Path) {
    let text = format!(
"*********************************
 SETTINGS FOR RUN @ 20230101-0000
 STARTING WITH t =              0
*********************************
width in nm: {W:>20}
mass in u  : {M:>20}
grid size  : {N:>20}
dr in nm   : {DR:>20}
dt in ns   : {dt:>20}
max. time  : {MAX_T:>20}
save every : {SAVE_EVERY:>20}
coupling   : {c:>20}
wave funct.: {g:>20}
",
        dt = dt(), c = 1, g = 'g',
    );
    fs::write(location.join(PARAM_FILE), text).unwrap();
}

// free evolution up to (but not including) `diverge_at`, a packet half again
// as wide from there on
fn write_run(location: &Path, diverge_at: u64) -> SnapshotStore {
    write_params(location);
    let params = RunParams::from_run_dir(location).unwrap();
    let grid = params.grid().unwrap();
    let store = SnapshotStore::create(location, params.n).unwrap();
    let free = FreeParams::new(W, M);
    let wide = FreeParams::new(1.5 * W, M);
    for step in (SAVE_EVERY..=MAX_T).step_by(SAVE_EVERY as usize) {
        let time = step as f64 * params.dt;
        let psi
            = if step < diverge_at { free.evaluate(time, &grid) }
            else { wide.evaluate(time, &grid) };
        store.save(&Snapshot::new(step, psi)).unwrap();
    }
    store
}

#[test]
fn scan_finds_divergence_on_disk() {
    let dir = TempDir::new().unwrap();
    write_run(dir.path(), 4000);
    let params = RunParams::from_run_dir(dir.path()).unwrap();
    assert_eq!(params.dt, dt());
    let store = SnapshotStore::open(dir.path(), params.n).unwrap();
    let scanner = DeviationScanner::new(&store, params.scan_config(0.1).unwrap())
        .unwrap();
    let outcome = scanner.scan().unwrap();
    match outcome {
        ScanOutcome::Found { mass, time, step, deviation } => {
            assert_eq!(step, 4000);
            assert_eq!(mass, M);
            assert_relative_eq!(time, 4000.0 * dt());
            assert!(deviation > 0.1);
        },
        other => panic!("expected a deviation; got {:?}", other),
    }
    assert_eq!(
        outcome.to_string(),
        format!("{} \t {}", sci(M), sci(units::ns_to_s(4000.0 * dt()))),
    );
}

#[test]
fn free_run_is_exhausted() {
    let dir = TempDir::new().unwrap();
    let store = write_run(dir.path(), u64::MAX);
    let params = RunParams::from_run_dir(dir.path()).unwrap();
    let scanner = DeviationScanner::new(&store, params.scan_config(0.01).unwrap())
        .unwrap();
    let outcome = scanner.scan().unwrap();
    assert_eq!(outcome, ScanOutcome::Exhausted { compared: 5, skipped: 0 });
    assert_eq!(outcome.to_string(), "No difference to free solution");
}

#[test]
fn missing_snapshot_aborts_scan() {
    let dir = TempDir::new().unwrap();
    let store = write_run(dir.path(), u64::MAX);
    fs::remove_file(store.path_for(3000)).unwrap();
    let params = RunParams::from_run_dir(dir.path()).unwrap();
    let scanner = DeviationScanner::new(&store, params.scan_config(0.1).unwrap())
        .unwrap();
    assert!(matches!(
        scanner.scan(),
        Err(ScanError::Snapshot(SnapshotError::Missing { step: 3000, .. }))
    ));
}

#[test]
fn corrupt_snapshot_is_surfaced() {
    let dir = TempDir::new().unwrap();
    let store = write_run(dir.path(), u64::MAX);
    let mut bad = store.load(2000).unwrap();
    bad.psi[17].re = f64::INFINITY;
    store.save(&bad).unwrap();
    let params = RunParams::from_run_dir(dir.path()).unwrap();
    let scanner = DeviationScanner::new(&store, params.scan_config(0.1).unwrap())
        .unwrap();
    assert!(matches!(
        scanner.scan(),
        Err(ScanError::Snapshot(SnapshotError::Integrity { index: 17, .. }))
    ));
    let lenient = store.clone().with_policy(IntegrityPolicy::Warn);
    assert!(lenient.load(2000).unwrap().psi[17].re.is_infinite());
}

#[test]
fn tracked_series_to_table() {
    let dir = TempDir::new().unwrap();
    let store = write_run(dir.path(), u64::MAX);
    let params = RunParams::from_run_dir(dir.path()).unwrap();
    let config = params.track_config().unwrap();
    let outfile = dir.path().join(Observable::Rmax.file_name());
    check_absent(&outfile).unwrap();

    let tracker = ObservableTracker::new(&store, Observable::Rmax, config).unwrap();
    let mut table = TableWriter::create(&outfile).unwrap();
    for row in tracker.rows() {
        let (time, value) = row.unwrap();
        table.row(time, value).unwrap();
    }
    assert_eq!(table.finish().unwrap(), 6);

    let text = fs::read_to_string(&outfile).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], format!("{}\t{}", sci(0.0), sci(W)));
    let (t, r) = lines[5].split_once('\t').unwrap();
    assert_relative_eq!(t.parse::<f64>().unwrap(), units::ns_to_s(5000.0 * dt()), max_relative = 1e-6);
    // a = 0.5 at the last step; rmax = w √(1 + a²) to within a grid step
    assert_relative_eq!(r.parse::<f64>().unwrap(), 1.25_f64.sqrt(), epsilon = DR);

    assert!(matches!(check_absent(&outfile), Err(TableError::Exists(_))));
    assert!(matches!(TableWriter::create(&outfile), Err(TableError::Exists(_))));
}

#[test]
fn unphysical_mass_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_params(dir.path());
    let path = dir.path().join(PARAM_FILE);
    let text
        = fs::read_to_string(&path).unwrap()
        .replace(&format!("mass in u  : {:>20}", M), &format!("mass in u  : {:>20}", 0));
    fs::write(&path, text).unwrap();
    assert!(matches!(
        RunParams::from_run_dir(dir.path()),
        Err(ParamError::BadValue { key: "mass in u", .. })
    ));
}

#[test]
fn missing_run_directory() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        SnapshotStore::open(dir.path().join("nowhere"), N),
        Err(SnapshotError::MissingInput(_))
    ));
}
