use clap::Parser;
use std::path::PathBuf;

use crate::{ExtractorKind, FailurePolicy};

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Extract photo metadata from a directory tree and emit Elasticsearch bulk NDJSON.
#[derive(Clone, Parser)]
#[command(name = "photodex")]
#[command(about = "Extract photo metadata into bulk NDJSON; use --push to send it to Elasticsearch.")]
pub struct Cli {
    /// Directory to scan. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Config file (TOML). Default: `.photodex.toml` in DIR when present.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Write NDJSON to this file instead of stdout. Ignored with --push.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// POST the result to `<url>/_bulk` instead of writing it out.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub push: Option<bool>,

    /// Elasticsearch base URL (also PHOTODEX_ES_URL).
    #[arg(long, short = 'u')]
    pub url: Option<String>,

    /// Bulk index name.
    #[arg(long, short = 'i')]
    pub index: Option<String>,

    /// Extraction worker threads.
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Extraction task queue capacity.
    #[arg(long, short = 'q')]
    pub queue_size: Option<usize>,

    /// Documents per bulk request when pushing (0 = one request).
    #[arg(long, short = 'b')]
    pub bulk_size: Option<usize>,

    /// What to do when one file fails to convert.
    #[arg(long, value_enum)]
    pub on_error: Option<FailurePolicy>,

    /// Metadata reader.
    #[arg(long, value_enum)]
    pub extractor: Option<ExtractorKind>,

    /// Only emit records whose MIME type is image/*.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub images_only: Option<bool>,

    /// Interpret capture dates in the local timezone instead of UTC.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub local_time: Option<bool>,

    /// Walk the tree in parallel (jwalk).
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub parallel_walk: Option<bool>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
