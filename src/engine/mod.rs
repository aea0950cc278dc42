//! Engine module: command line, store access and progress reporting

pub mod arg_parser;
pub mod cli;
pub mod db_ops;
pub mod handlers;
pub mod progress;

// Re-export commonly used functions
pub use arg_parser::{Cli, Commands, CommonArgs};
pub use cli::{build_opts, handle_run};
pub use db_ops::{checkpoint, open_db, open_db_in_memory};
pub use handlers::{handle_crawl, handle_export, handle_status};
