//! Engine module: CLI parsing, option layering, progress, and path helpers

pub mod arg_parser;
pub mod cli;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{build_opts, handle_run};
pub use tools::{canonicalize_root, glob_match, is_os_hidden_file, path_relative_to, should_include_in_walk};
