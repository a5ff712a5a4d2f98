use lib::{ init_logging, Run };
use sndisp::{ snapshot::IntegrityPolicy, track::Observable };

const LOCATION: &str = "/tmp/test";
const POLICY: IntegrityPolicy = IntegrityPolicy::Surface;

fn main() -> anyhow::Result<()> {
    init_logging();
    Run::open(LOCATION, POLICY)?.write_series(Observable::R90)
}
