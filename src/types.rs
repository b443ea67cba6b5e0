//! Public and internal types for the photodex API and pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::config::{Defaults, PackagePaths};

/// Basic file-info snapshot taken by the walk (name and size only).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
}

/// A file awaiting conversion. Consumed exactly once by one worker.
#[derive(Clone, Debug)]
pub struct ExtractionTask {
    pub path: PathBuf,
    pub info: FileInfo,
}

/// Structured per-file output record. Metadata-derived fields are `None` when the tag is absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub import_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutter_speed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    pub file_size: u64,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// Capture date in epoch milliseconds, as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// `"lat,long"` in signed decimal degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps: Option<String>,
}

/// Target of one bulk `index` action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkIndexTarget {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
}

/// Per-document bulk header: `{"index":{"_index":..,"_id":..}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkEntryHeader {
    pub index: BulkIndexTarget,
}

/// A converted record awaiting emission. Header and model always travel together.
#[derive(Clone, Debug)]
pub struct PrintTask {
    pub header: BulkEntryHeader,
    pub model: Model,
}

/// What a worker does when one file fails to convert.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Cancel the whole run on the first conversion error.
    #[default]
    Abort,
    /// Log the file, record it as skipped, and keep going.
    Skip,
}

/// Zone in which the naive capture timestamp is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateZone {
    #[default]
    Utc,
    Local,
}

/// Which metadata facility the workers call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    /// `exiftool -j` subprocess per file.
    #[default]
    Exiftool,
    /// In-process EXIF reader.
    Native,
}

/// Full options (CLI, config file, and lib).
#[derive(Clone, Debug)]
pub struct Opts {
    /// Extraction workers. Values below 1 fall back to the default (4).
    pub thread_count: usize,
    /// Capacity of the extraction task channel. Values below 1 fall back to the default (50).
    pub queue_size: usize,
    /// Bulk index name stamped into every header.
    pub index_name: String,
    /// Conversion failure handling.
    pub on_error: FailurePolicy,
    /// Drop records whose MIME type is not `image/*`.
    pub images_only: bool,
    /// Zone for capture dates.
    pub date_zone: DateZone,
    /// Metadata facility.
    pub extractor: ExtractorKind,
    /// Use parallel walk (jwalk).
    pub parallel_walk: bool,
    /// Follow symbolic links.
    pub follow_links: bool,
    /// Exclude patterns (glob syntax, e.g. `*.xmp`, `@eaDir`).
    pub exclude: Vec<String>,
    /// Show a progress counter (verbose mode).
    pub verbose: bool,
    /// Explicit log level from the config file (`error`..`trace`).
    pub log_level: Option<String>,
    /// Elasticsearch base URL.
    pub url: String,
    /// Documents per POST when pushing; 0 sends everything in one request.
    pub bulk_size: usize,
    /// Push to the backend instead of writing to `output`.
    pub push: bool,
    /// Output file. When None (and not pushing), writes to stdout.
    pub output: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Opts {
            thread_count: Defaults::THREAD_COUNT,
            queue_size: Defaults::QUEUE_SIZE,
            index_name: PackagePaths::get().default_index().to_string(),
            on_error: FailurePolicy::default(),
            images_only: false,
            date_zone: DateZone::default(),
            extractor: ExtractorKind::default(),
            parallel_walk: false,
            follow_links: false,
            exclude: Vec::new(),
            verbose: false,
            log_level: None,
            url: Defaults::URL.to_string(),
            bulk_size: 0,
            push: false,
            output: None,
        }
    }
}

impl Opts {
    /// Effective worker count.
    pub fn extraction_thread_count(&self) -> usize {
        if self.thread_count < 1 {
            Defaults::THREAD_COUNT
        } else {
            self.thread_count
        }
    }

    /// Effective extraction task channel capacity.
    pub fn to_extract_channel_size(&self) -> usize {
        if self.queue_size < 1 {
            Defaults::QUEUE_SIZE
        } else {
            self.queue_size
        }
    }
}

/// Outcome of a successful [`dump`](crate::pipeline::dump).
#[derive(Debug, Default)]
pub struct DumpSummary {
    /// Files handed to the workers by the walk.
    pub files: usize,
    /// Documents written (header + record pairs).
    pub documents: usize,
    /// Records dropped by the `images_only` filter.
    pub filtered: usize,
    /// Files that failed under [`FailurePolicy::Skip`], with the cause.
    pub skipped: Vec<(PathBuf, String)>,
}
