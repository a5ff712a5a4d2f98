use anyhow::Context;
use lib::{ init_logging, Run };
use sndisp::{ scan::DeviationScanner, snapshot::IntegrityPolicy };

const LOCATION: &str = "/tmp/test";
const ERR: f64 = 0.1; // relative half-width deviation
const POLICY: IntegrityPolicy = IntegrityPolicy::Surface;

fn main() -> anyhow::Result<()> {
    init_logging();
    let run = Run::open(LOCATION, POLICY)?;
    let config = run.params.scan_config(ERR)?;
    let scanner = DeviationScanner::new(&run.store, config)?;
    let outcome
        = scanner.scan()
        .with_context(|| format!("scanning {}", LOCATION))?;
    println!("{}", outcome);
    Ok(())
}
