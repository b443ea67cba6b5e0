//! Run entry point: dump to a file/stdout, or buffer and push to the backend.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::bulk::push;
use crate::engine::progress::{ProgressBar, create_counter, finish_progress_bar, progress_callback};
use crate::metadata::{MetadataExtractor, extractor_for};
use crate::pipeline::{CancelToken, DumpHooks, dump_with};
use crate::{DumpSummary, Opts};

/// Ctrl+C cancels the run; the pipeline unwinds and the caller gets an error.
/// Only one handler may exist per process, so a second run in the same process goes without.
fn install_cancel_handler() -> CancelToken {
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        warn!("Ctrl+C handler not installed: {}", e);
    }
    cancel
}

fn run_dump<W: Write + Send>(
    root: &Path,
    opts: &Opts,
    extractor: &dyn MetadataExtractor,
    writer: W,
    cancel: CancelToken,
) -> Result<DumpSummary> {
    let bar: Option<ProgressBar> = opts.verbose.then(|| create_counter("Extracting"));
    let hooks = DumpHooks {
        cancel: Some(cancel),
        import_id: None,
        on_emitted: progress_callback(&bar),
    };
    let result = dump_with(root, opts, extractor, writer, hooks);
    finish_progress_bar(&bar);
    result
}

/// Scan `root` with `opts`: write NDJSON to `opts.output` (or stdout), or push it when `opts.push`.
pub fn index_dir(root: &Path, opts: &Opts) -> Result<DumpSummary> {
    let extractor = extractor_for(opts)?;
    let cancel = install_cancel_handler();

    if opts.push {
        let mut buffer: Vec<u8> = Vec::new();
        let summary = run_dump(root, opts, extractor.as_ref(), &mut buffer, cancel)?;
        push(&opts.url, &buffer, opts.bulk_size)?;
        info!("Indexed {} documents into {}", summary.documents, opts.index_name);
        return Ok(summary);
    }

    match &opts.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create output file {}", path.display()))?;
            run_dump(root, opts, extractor.as_ref(), BufWriter::new(file), cancel)
        }
        None => run_dump(
            root,
            opts,
            extractor.as_ref(),
            BufWriter::new(std::io::stdout()),
            cancel,
        ),
    }
}
