use anyhow::{Result, anyhow};
use log::{debug, info};
use std::io::Write;
use std::path::Path;
use std::thread;

use super::context::{CancelToken, PipelineState, create_pipeline_channels};
use super::emitter::{EmitCallback, emit_loop};
use super::error_handler::resolve_pipeline_outcome;
use super::extract::{WorkerSettings, spawn_extraction_workers};
use super::walk::{run_walk_loop, walk_iter};
use crate::engine::tools::canonicalize_root;
use crate::metadata::{MetadataExtractor, RecordConverter};
use crate::{DumpSummary, Opts};

/// Optional run inputs for [`dump_with`].
#[derive(Default)]
pub struct DumpHooks {
    /// Cancel from outside (e.g. a Ctrl+C handler). A fresh token is used when None.
    pub cancel: Option<CancelToken>,
    /// Run identifier stamped into every record. A UUID v4 is generated when None.
    pub import_id: Option<String>,
    /// Progress callback, called by the emitter after each document.
    pub on_emitted: Option<EmitCallback>,
}

/// Fresh run identifier.
pub fn new_import_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Walk `root`, convert every file with `extractor`, and write bulk NDJSON to `writer`.
pub fn dump<W: Write + Send>(
    root: &Path,
    opts: &Opts,
    extractor: &dyn MetadataExtractor,
    writer: W,
) -> Result<DumpSummary> {
    dump_with(root, opts, extractor, writer, DumpHooks::default())
}

/// Main orchestrator: walk → task channel → workers → print channel → emitter → `writer`.
///
/// The walk runs on the calling thread; workers and the emitter run on scoped threads, so
/// every thread has been joined when this returns, on success and failure alike.
pub fn dump_with<W: Write + Send>(
    root: &Path,
    opts: &Opts,
    extractor: &dyn MetadataExtractor,
    writer: W,
    hooks: DumpHooks,
) -> Result<DumpSummary> {
    let root = canonicalize_root(root)?;
    let DumpHooks {
        cancel,
        import_id,
        on_emitted,
    } = hooks;
    let state = PipelineState::new(cancel.unwrap_or_default());
    let import_id = import_id.unwrap_or_else(new_import_id);
    let num_threads = opts.extraction_thread_count();
    info!(
        "Dumping {} (import {}, {} workers, queue {})",
        root.display(),
        import_id,
        num_threads,
        opts.to_extract_channel_size()
    );

    let converter = RecordConverter::new(extractor, &import_id, opts.date_zone);
    let settings = WorkerSettings {
        index_name: &opts.index_name,
        on_error: opts.on_error,
        images_only: opts.images_only,
    };
    let channels = create_pipeline_channels(opts);

    let (walk, documents, panicked) = thread::scope(|s| {
        let state = &state;
        let print_rx = channels.print_rx;
        let emitter = s.spawn(move || emit_loop(print_rx, writer, state, on_emitted));
        let workers = spawn_extraction_workers(
            s,
            channels.task_rx,
            channels.print_tx,
            &converter,
            settings,
            state,
            num_threads,
        );

        let walk = run_walk_loop(
            channels.task_tx,
            walk_iter(&root, opts),
            &root,
            &opts.exclude,
            state,
        );
        if walk.is_err() {
            state.cancel.cancel();
        }

        let mut panicked = workers
            .into_iter()
            .map(|h| h.join())
            .filter(Result::is_err)
            .count();
        let documents = emitter.join().unwrap_or_else(|_| {
            panicked += 1;
            0
        });
        (walk, documents, panicked)
    });
    debug!("pipeline joined: {:?} files, {} documents", walk.as_ref().ok(), documents);

    if panicked > 0 && walk.is_ok() {
        state.fail(anyhow!("{} pipeline thread(s) panicked", panicked));
    }
    let summary = resolve_pipeline_outcome(walk, documents, &state, opts.verbose)?;
    info!(
        "Done: {} files, {} documents, {} filtered, {} skipped",
        summary.files,
        summary.documents,
        summary.filtered,
        summary.skipped.len()
    );
    Ok(summary)
}
