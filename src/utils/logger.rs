use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;
use std::str::FromStr;

/// Resolve the level for this crate: explicit `log_level` wins, then verbose, then info.
fn crate_level(verbose: bool, log_level: Option<&str>) -> LevelFilter {
    if let Some(raw) = log_level {
        match LevelFilter::from_str(raw.trim()) {
            Ok(level) => return level,
            Err(_) => eprintln!(
                "[{}] unknown log level {:?}, using default",
                env!("CARGO_PKG_NAME"),
                raw
            ),
        }
    }
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the logger. Everything goes to stderr so stdout stays pure NDJSON.
pub fn setup_logging(verbose: bool, log_level: Option<&str>) {
    let level = crate_level(verbose, log_level);

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_PKG_NAME"), level) // Our crate: use requested level
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        Level::Error => "ERROR".red(),
                        _ => unreachable!(),
                    };
                    let path = record.target().to_string().white();
                    format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
                }
                _ => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
