//! Walk loop: turns directory-walk results into extraction tasks on the bounded task channel.

use anyhow::{Result, anyhow};
use crossbeam_channel::Sender;
use log::debug;
use std::path::{Path, PathBuf};

use super::context::PipelineState;
use crate::engine::tools::should_include_in_walk;
use crate::{ExtractionTask, FileInfo, Opts};

/// One result from a directory walk.
pub enum WalkOutcome {
    /// Regular file, with its info snapshot.
    File(ExtractionTask),
    /// Directory or other non-file entry; not a task.
    Other,
    Err { msg: String, path: Option<PathBuf> },
}

fn file_task(path: PathBuf, name: &std::ffi::OsStr, size: u64) -> WalkOutcome {
    WalkOutcome::File(ExtractionTask {
        info: FileInfo {
            name: name.to_string_lossy().into_owned(),
            size,
        },
        path,
    })
}

/// Convert a jwalk result into [`WalkOutcome`].
pub fn to_outcome_jwalk(r: Result<jwalk::DirEntry<((), ())>, jwalk::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_file() => match entry.metadata() {
            Ok(meta) => file_task(entry.path(), entry.file_name(), meta.len()),
            Err(err) => WalkOutcome::Err {
                msg: format!("{}", err),
                path: Some(entry.path()),
            },
        },
        Ok(_) => WalkOutcome::Other,
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_file() => match entry.metadata() {
            Ok(meta) => file_task(entry.path().to_path_buf(), entry.file_name(), meta.len()),
            Err(err) => WalkOutcome::Err {
                msg: format!("{}", err),
                path: Some(entry.into_path()),
            },
        },
        Ok(_) => WalkOutcome::Other,
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

fn jwalk_iter(root: &Path, follow_links: bool) -> Box<dyn Iterator<Item = WalkOutcome>> {
    use jwalk::Parallelism;
    use std::time::Duration;
    Box::new(
        jwalk::WalkDir::new(root)
            .follow_links(follow_links)
            .parallelism(Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_secs(60),
            })
            .into_iter()
            .map(to_outcome_jwalk),
    )
}

fn walkdir_iter(root: &Path, follow_links: bool) -> Box<dyn Iterator<Item = WalkOutcome>> {
    Box::new(
        walkdir::WalkDir::new(root)
            .follow_links(follow_links)
            .into_iter()
            .map(to_outcome_walkdir),
    )
}

/// Serial (walkdir) or parallel (jwalk) traversal of `root`, per `opts.parallel_walk`.
pub fn walk_iter(root: &Path, opts: &Opts) -> Box<dyn Iterator<Item = WalkOutcome>> {
    match opts.parallel_walk {
        true => jwalk_iter(root, opts.follow_links),
        false => walkdir_iter(root, opts.follow_links),
    }
}

/// Consume `iter`, send one task per included file on `task_tx`, and return the number sent.
///
/// Stops early when the run is cancelled or every worker has gone (send fails). A walk error
/// ends the loop and is returned; the caller cancels the run. `task_tx` is dropped on return,
/// which closes the task channel.
pub fn run_walk_loop<I>(
    task_tx: Sender<ExtractionTask>,
    iter: I,
    root: &Path,
    exclude: &[String],
    state: &PipelineState,
) -> Result<usize>
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut count = 0_usize;
    for outcome in iter {
        if state.is_cancelled() {
            debug!("walk: cancelled after {} files", count);
            break;
        }
        match outcome {
            WalkOutcome::File(task) => {
                if !should_include_in_walk(&task.path, root, exclude) {
                    continue;
                }
                if task_tx.send(task).is_err() {
                    debug!("walk: task channel disconnected after {} files", count);
                    break;
                }
                count += 1;
            }
            WalkOutcome::Other => {}
            WalkOutcome::Err { msg, path } => {
                return Err(match path {
                    Some(p) => anyhow!("{}: {}", p.display(), msg),
                    None => anyhow!("{}", msg),
                });
            }
        }
    }
    drop(task_tx);
    Ok(count)
}
