//! Stage 4: ingest well tops for known wellbores

use std::process::ExitCode;

use wdl_ingest::{RunOptions, init_logging, run_cli};
use wdl_ingest_core::Stage;

fn main() -> anyhow::Result<ExitCode> {
    init_logging();
    run_cli(&[Stage::WellTops], RunOptions::default())
}
