//! photodex: concurrent photo metadata extraction into Elasticsearch bulk NDJSON

pub mod bulk;
pub mod engine;
pub mod index;
pub mod metadata;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use index::index_dir;
pub use pipeline::{CancelToken, DumpHooks, dump, dump_with};

/// Result alias used by public photodex API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
