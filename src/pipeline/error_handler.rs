use anyhow::{Result, anyhow};
use log::warn;

use super::context::PipelineState;
use crate::DumpSummary;

/// Collapse the run into one result. Call after every stage has been joined.
///
/// Precedence: walk error, then the first downstream failure, then an external cancel
/// (e.g. Ctrl+C). Skipped files are logged, not returned as an error.
pub fn resolve_pipeline_outcome(
    walk: Result<usize>,
    documents: usize,
    state: &PipelineState,
    verbose: bool,
) -> Result<DumpSummary> {
    let files = walk.map_err(|e| e.context("error while browsing directory"))?;
    if let Some(e) = state.take_first_error() {
        return Err(e);
    }
    if state.is_cancelled() {
        return Err(anyhow!("pipeline cancelled"));
    }
    let skipped = state.take_skipped();
    if !skipped.is_empty() {
        warn!("Skipped {} files due to conversion errors", skipped.len());
        if verbose {
            for (p, msg) in &skipped {
                eprintln!("  skipped: {}: {}", p.display(), msg);
            }
        }
    }
    Ok(DumpSummary {
        files,
        documents,
        filtered: state.filtered(),
        skipped,
    })
}
