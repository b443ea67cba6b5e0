//! photodex CLI: dump photo metadata as bulk NDJSON; use --push to send it to Elasticsearch.

use anyhow::Result;
use clap::Parser;
use photodex::engine::arg_parser::Cli;
use photodex::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
