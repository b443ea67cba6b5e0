//! Pipeline context: cancellation, shared failure state, and the two bounded channels.

use anyhow::Error;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{ExtractionTask, Opts, PrintTask};

/// Cooperative cancellation flag. Cloneable so a signal handler can hold one.
/// Cancelling is idempotent.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// State shared by the walk, the workers, and the emitter for one run.
pub struct PipelineState {
    pub cancel: CancelToken,
    first_error: Mutex<Option<Error>>,
    skipped_paths: Mutex<Vec<(PathBuf, String)>>,
    filtered: AtomicUsize,
}

impl PipelineState {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            cancel,
            first_error: Mutex::new(None),
            skipped_paths: Mutex::new(Vec::new()),
            filtered: AtomicUsize::new(0),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Record `err` if it is the first failure, then cancel the run.
    pub fn fail(&self, err: Error) {
        self.first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(err);
        self.cancel.cancel();
    }

    pub fn record_skipped(&self, path: PathBuf, msg: String) {
        self.skipped_paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((path, msg));
    }

    pub fn record_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn filtered(&self) -> usize {
        self.filtered.load(Ordering::Relaxed)
    }

    pub fn take_first_error(&self) -> Option<Error> {
        self.first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn take_skipped(&self) -> Vec<(PathBuf, String)> {
        std::mem::take(
            &mut *self
                .skipped_paths
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

/// Channels for the pipeline. Walk gets `task_tx`; workers get `task_rx` and `print_tx`; emitter gets `print_rx`.
pub struct PipelineChannels {
    pub task_tx: Sender<ExtractionTask>,
    pub task_rx: Receiver<ExtractionTask>,
    pub print_tx: Sender<PrintTask>,
    pub print_rx: Receiver<PrintTask>,
}

/// Task channel sized by `queue_size`; print channel sized by the worker count.
pub fn create_pipeline_channels(opts: &Opts) -> PipelineChannels {
    let (task_tx, task_rx) = bounded::<ExtractionTask>(opts.to_extract_channel_size());
    let (print_tx, print_rx) = bounded::<PrintTask>(opts.extraction_thread_count());
    PipelineChannels {
        task_tx,
        task_rx,
        print_tx,
        print_rx,
    }
}
