//! CLI command handler: dump to stdout/file by default; --push sends the bulk body to Elasticsearch.

use anyhow::Result;
use log::debug;

use crate::engine::arg_parser::Cli;
use crate::index::index_dir;
use crate::utils::{apply_file_to_opts, load_photodex_toml, setup_logging, url_from_env};
use crate::{DateZone, Opts};

/// Overwrite opts field from a CLI flag when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Layer defaults → config file → environment → CLI flags.
pub fn build_opts(cli: &Cli) -> Result<Opts> {
    let mut opts = Opts::default();
    if let Some(file) = load_photodex_toml(&cli.dir, cli.config.as_deref())? {
        apply_file_to_opts(&file, &mut opts);
    }
    if let Some(url) = url_from_env(&cli.dir) {
        opts.url = url;
    }
    apply_cli_opt!(cli, opts, url => url);
    apply_cli_opt!(cli, opts, index => index_name);
    apply_cli_opt!(cli, opts, threads => thread_count);
    apply_cli_opt!(cli, opts, queue_size => queue_size);
    apply_cli_opt!(cli, opts, bulk_size => bulk_size);
    apply_cli_opt!(cli, opts, on_error => on_error);
    apply_cli_opt!(cli, opts, extractor => extractor);
    apply_cli_opt!(cli, opts, images_only => images_only);
    apply_cli_opt!(cli, opts, parallel_walk => parallel_walk);
    apply_cli_opt!(cli, opts, follow_links => follow_links);
    apply_cli_opt!(cli, opts, verbose => verbose);
    apply_cli_opt!(cli, opts, push => push);
    if cli.local_time == Some(true) {
        opts.date_zone = DateZone::Local;
    }
    if !cli.exclude.is_empty() {
        opts.exclude.extend(cli.exclude.iter().cloned());
    }
    if cli.output.is_some() {
        opts.output = cli.output.clone();
    }
    Ok(opts)
}

/// Build options, set up logging, and run.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = build_opts(cli)?;
    setup_logging(opts.verbose, opts.log_level.as_deref());
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    index_dir(&cli.dir, &opts)?;
    Ok(())
}
