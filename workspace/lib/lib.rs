//! Shared setup for the analysis drivers.

use std::{ io::IsTerminal, path::Path };
use anyhow::Context;
use sndisp::{
    params::RunParams,
    snapshot::{ IntegrityPolicy, SnapshotStore },
    table::{ check_absent, TableWriter },
    track::{ Observable, ObservableTracker },
};
use tracing::info;
use tracing_subscriber::{
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Registry,
};

/// Install the global subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Logs go to stderr so that stdout carries only the driver's report.
pub fn init_logging() {
    let filter
        = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer
        = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal());
    Registry::default().with(filter).with(fmt_layer).init();
}

/// A simulation run on disk: its settings and its snapshots.
#[derive(Clone, Debug)]
pub struct Run {
    pub params: RunParams,
    pub store: SnapshotStore,
}

impl Run {
    /// Open the run at `location`, reading `param.txt` for the grid size.
    pub fn open<P>(location: P, policy: IntegrityPolicy) -> anyhow::Result<Self>
    where P: AsRef<Path>
    {
        let location = location.as_ref();
        let params
            = RunParams::from_run_dir(location)
            .with_context(|| format!("reading settings of {}", location.display()))?;
        let store
            = SnapshotStore::open(location, params.n)?
            .with_policy(policy);
        info!(
            location = %location.display(),
            m = params.m,
            w = params.w,
            n = params.n,
            max_t = params.max_t,
            save_every = params.save_every,
            coupling = params.coupling,
            start_t = params.start_t,
            "opened run"
        );
        Ok(Self { params, store })
    }

    /// Tabulate `observable` over the whole run into `location/<file_name>`,
    /// which must not exist yet.
    pub fn write_series(&self, observable: Observable) -> anyhow::Result<()> {
        let outfile = self.store.location().join(observable.file_name());
        check_absent(&outfile)?;
        let config = self.params.track_config()?;
        let tracker = ObservableTracker::new(&self.store, observable, config)?;
        let mut table = TableWriter::create(&outfile)?;
        for row in tracker.rows() {
            let (time, value) = row?;
            table.row(time, value)?;
        }
        let rows = table.finish()?;
        info!(outfile = %outfile.display(), rows, ?observable, "wrote series");
        Ok(())
    }
}
