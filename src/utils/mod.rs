pub mod config;
pub mod logger;
pub mod photodex_toml;

pub use config::*;
pub use logger::setup_logging;
pub use photodex_toml::{apply_file_to_opts, load_photodex_toml, parse_photodex_toml, url_from_env};
