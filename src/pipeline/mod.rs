//! Pipeline components: context, walk loop, extraction workers, emitter, error handling.

pub mod context;
pub mod emitter;
pub mod error_handler;
pub mod extract;
pub mod orchestrator;
pub mod walk;

pub use context::{CancelToken, PipelineChannels, PipelineState, create_pipeline_channels};
pub use emitter::{EmitCallback, emit_loop, write_print_task};
pub use error_handler::resolve_pipeline_outcome;
pub use extract::{WorkerSettings, spawn_extraction_workers};
pub use orchestrator::{DumpHooks, dump, dump_with, new_import_id};
pub use walk::{WalkOutcome, run_walk_loop, to_outcome_jwalk, to_outcome_walkdir, walk_iter};
