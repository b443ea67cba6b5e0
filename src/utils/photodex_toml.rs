//! Config file and environment layers (CLI only). The lib takes a ready [`Opts`].
//!
//! Lookup: `--config PATH` when given (must exist), else `.photodex.toml` in the scanned
//! directory when present. `PHOTODEX_ES_URL` (process env, then `.env` in the directory)
//! overrides the file's URL.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;
use crate::{DateZone, ExtractorKind, FailurePolicy, Opts};

#[derive(Debug, Default, Deserialize)]
pub struct PhotodexToml {
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    indexer: IndexerSection,
    #[serde(default)]
    elasticsearch: ElasticsearchSection,
}

#[derive(Debug, Default, Deserialize)]
struct IndexerSection {
    thread_count: Option<usize>,
    queue_size: Option<usize>,
    on_error: Option<FailurePolicy>,
    images_only: Option<bool>,
    date_zone: Option<DateZone>,
    extractor: Option<ExtractorKind>,
    parallel_walk: Option<bool>,
    follow_links: Option<bool>,
    exclude: Option<Vec<String>>,
    verbose: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ElasticsearchSection {
    url: Option<String>,
    index: Option<String>,
    bulk_size: Option<usize>,
}

/// Parse a config document.
pub fn parse_photodex_toml(s: &str) -> Result<PhotodexToml> {
    toml::from_str(s).context("parse config")
}

/// Load the config file: explicit path is required to exist; otherwise `.photodex.toml` in
/// `dir` is optional (missing file gives `None`).
pub fn load_photodex_toml(dir: &Path, explicit: Option<&Path>) -> Result<Option<PhotodexToml>> {
    let (path, required): (PathBuf, bool) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (dir.join(PackagePaths::get().config_filename()), false),
    };
    if !required && !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("error while opening configuration file {}", path.display()))?;
    let file = parse_photodex_toml(&s)
        .with_context(|| format!("error while unmarshaling configuration file {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(Some(file))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
pub fn apply_file_to_opts(file: &PhotodexToml, opts: &mut Opts) {
    if let Some(ref level) = file.log_level {
        opts.log_level = Some(level.clone());
    }
    let idx = &file.indexer;
    apply_file_opt!(idx, opts, thread_count => thread_count);
    apply_file_opt!(idx, opts, queue_size => queue_size);
    apply_file_opt!(idx, opts, on_error => on_error);
    apply_file_opt!(idx, opts, images_only => images_only);
    apply_file_opt!(idx, opts, date_zone => date_zone);
    apply_file_opt!(idx, opts, extractor => extractor);
    apply_file_opt!(idx, opts, parallel_walk => parallel_walk);
    apply_file_opt!(idx, opts, follow_links => follow_links);
    apply_file_opt!(idx, opts, exclude => exclude);
    apply_file_opt!(idx, opts, verbose => verbose);
    let es = &file.elasticsearch;
    apply_file_opt!(es, opts, url => url);
    apply_file_opt!(es, opts, index => index_name);
    apply_file_opt!(es, opts, bulk_size => bulk_size);
}

/// URL override: process env first, then `.env` in `dir`.
pub fn url_from_env(dir: &Path) -> Option<String> {
    let key = PackagePaths::get().env_url_key();
    let read = || {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    if let Some(s) = read() {
        return Some(s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        return read();
    }
    None
}
