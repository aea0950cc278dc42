pub mod config;
pub mod crawl_toml;
pub mod env;
pub mod logger;
pub mod tempfiles;

pub use config::*;
pub use crawl_toml::{CrawlToml, apply_file_to_opts, load_crawl_toml, parse_crawl_toml};
pub use env::{apply_env_to_opts, env_override};
pub use logger::{Colors, setup_logging};
pub use tempfiles::write_replacing;
