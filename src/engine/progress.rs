//! Progress counter for emitted documents (verbose mode)

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

use crate::pipeline::EmitCallback;

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " docs"
    )))
}

/// Advance the bar by `n`. Blocks briefly on the lock: only the emitter thread updates it.
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.lock() {
        let _ = pb.update(n);
    }
}

/// Emitter callback that ticks the bar once per document.
pub fn progress_callback(bar: &Option<ProgressBar>) -> Option<EmitCallback> {
    bar.as_ref().map(|bar| {
        let bar = Arc::clone(bar);
        Box::new(move |_written: usize| update_progress_bar(&bar, 1)) as EmitCallback
    })
}

/// Final refresh and newline so following log lines start clean.
pub fn finish_progress_bar(bar: &Option<ProgressBar>) {
    if let Some(bar) = bar
        && let Ok(mut pb) = bar.lock()
    {
        let _ = pb.refresh();
        eprintln!();
    }
}
