//! Appcrawl CLI: crawl the catalog, or use `export` / `status` on an existing store.

use appcrawl::engine::arg_parser::Cli;
use appcrawl::engine::handle_run;
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;

#[tokio::main]
async fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    if let Err(e) = handle_run(&cli).await {
        if log::log_enabled!(log::Level::Error) {
            log::error!("{e:#}");
        } else {
            eprintln!("error: {e:#}");
        }
        return ExitCode::FAILURE;
    }
    log::debug!("Total time: {:?}", start_time.elapsed());
    ExitCode::SUCCESS
}
