//! Single consumer of print tasks: two NDJSON lines per document, header first.

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use log::{debug, error};
use std::io::Write;

use super::context::PipelineState;
use crate::PrintTask;

/// Called with the running document count after each document.
pub type EmitCallback = Box<dyn Fn(usize) + Send>;

/// Write one value as a single line.
fn write_line<W: Write, T: serde::Serialize>(writer: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Write the header line, then the record line.
pub fn write_print_task<W: Write>(writer: &mut W, task: &PrintTask) -> Result<()> {
    write_line(writer, &task.header).context("error while encoding header")?;
    write_line(writer, &task.model).context("error while encoding json")?;
    Ok(())
}

/// Drain `print_rx` into `writer` until the channel closes or the run is cancelled.
/// A write failure is always fatal: it is logged and cancels the run. Returns documents written.
pub fn emit_loop<W: Write>(
    print_rx: Receiver<PrintTask>,
    mut writer: W,
    state: &PipelineState,
    on_emitted: Option<EmitCallback>,
) -> usize {
    let mut written = 0_usize;
    while let Ok(task) = print_rx.recv() {
        if state.is_cancelled() {
            debug!("emitter: cancelled after {} documents", written);
            return written;
        }
        if let Err(e) = write_print_task(&mut writer, &task) {
            error!("{:#}", e);
            state.fail(e);
            return written;
        }
        written += 1;
        if let Some(cb) = &on_emitted {
            cb(written);
        }
    }
    if let Err(e) = writer.flush().context("flush output") {
        error!("{:#}", e);
        state.fail(e);
    }
    written
}
