use anyhow::Result;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error};
use std::thread::{Scope, ScopedJoinHandle};

use super::context::PipelineState;
use crate::bulk::bulk_entry_header;
use crate::metadata::RecordConverter;
use crate::utils::config::IMAGE_MIME_PREFIX;
use crate::{ExtractionTask, FailurePolicy, PrintTask};

/// Per-worker settings that do not change during a run.
#[derive(Clone, Copy)]
pub struct WorkerSettings<'a> {
    pub index_name: &'a str,
    pub on_error: FailurePolicy,
    pub images_only: bool,
}

/// Convert one task. `Ok(None)` means the record was dropped by the MIME filter.
fn process_task(
    task: &ExtractionTask,
    converter: &RecordConverter<'_>,
    settings: WorkerSettings<'_>,
) -> Result<Option<PrintTask>> {
    let model = converter.convert(&task.path, &task.info)?;
    if settings.images_only
        && !model
            .mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with(IMAGE_MIME_PREFIX))
    {
        debug!("filtered {} ({:?})", task.path.display(), model.mime_type);
        return Ok(None);
    }
    let header = bulk_entry_header(&task.path, settings.index_name);
    Ok(Some(PrintTask { header, model }))
}

/// Single extraction worker: pull tasks until the channel closes or the run is cancelled.
/// Never retries a task. Dropping `print_tx` on return lets the emitter see the channel close.
fn extraction_worker_loop(
    id: usize,
    task_rx: Receiver<ExtractionTask>,
    print_tx: Sender<PrintTask>,
    converter: &RecordConverter<'_>,
    settings: WorkerSettings<'_>,
    state: &PipelineState,
) {
    while let Ok(task) = task_rx.recv() {
        if state.is_cancelled() {
            debug!("worker {}: cancelled", id);
            return;
        }
        match process_task(&task, converter, settings) {
            Ok(Some(print_task)) => {
                if print_tx.send(print_task).is_err() {
                    debug!("worker {}: print channel disconnected", id);
                    return;
                }
            }
            Ok(None) => state.record_filtered(),
            Err(e) => {
                error!("{}: conversion error: {:#}", task.path.display(), e);
                match settings.on_error {
                    FailurePolicy::Abort => {
                        state.fail(e.context(format!("conversion of {}", task.path.display())));
                        return;
                    }
                    FailurePolicy::Skip => state.record_skipped(task.path, format!("{:#}", e)),
                }
            }
        }
    }
}

/// Spawn `num_threads` workers on `scope`. The caller's copies of the channel ends are consumed
/// here, so the print channel closes as soon as the last worker returns.
pub fn spawn_extraction_workers<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    task_rx: Receiver<ExtractionTask>,
    print_tx: Sender<PrintTask>,
    converter: &'env RecordConverter<'env>,
    settings: WorkerSettings<'env>,
    state: &'env PipelineState,
    num_threads: usize,
) -> Vec<ScopedJoinHandle<'scope, ()>> {
    (0..num_threads)
        .map(|id| {
            let task_rx = task_rx.clone();
            let print_tx = print_tx.clone();
            scope.spawn(move || {
                extraction_worker_loop(id, task_rx, print_tx, converter, settings, state)
            })
        })
        .collect()
}
