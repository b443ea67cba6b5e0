//! Application configuration constants.
//! Defaults and thresholds in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    env_url_key: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                env_url_key: format!("{}_ES_URL", pkg.to_uppercase()),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Config file looked up in the scanned directory when `--config` is not given.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable overriding the Elasticsearch URL (e.g. `PHOTODEX_ES_URL`).
    pub fn env_url_key(&self) -> &str {
        &self.env_url_key
    }

    /// Bulk index name used when none is configured.
    pub fn default_index(&self) -> &str {
        "photos"
    }
}

// ---- Pipeline defaults ----

/// Defaults for the configuration surface.
pub struct Defaults;

impl Defaults {
    /// Extraction workers.
    pub const THREAD_COUNT: usize = 4;
    /// Extraction task channel capacity.
    pub const QUEUE_SIZE: usize = 50;
    /// Elasticsearch base URL.
    pub const URL: &'static str = "http://localhost:9200";
}

// ---- Bulk push ----

/// Constants for the `_bulk` POST.
pub struct BulkConsts;

impl BulkConsts {
    pub const PATH_SUFFIX: &'static str = "_bulk";
    pub const CONTENT_TYPE: &'static str = "application/x-ndjson";
    pub const TIMEOUT: Duration = Duration::from_secs(60);
    /// Lines per document in the bulk body (header + record).
    pub const LINES_PER_DOC: usize = 2;
}

// ---- Metadata ----

/// Source timestamp layout of the capture date tag.
pub const SRC_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// MIME prefix kept by the `images_only` filter.
pub const IMAGE_MIME_PREFIX: &str = "image/";
