//! CLI command handler: full crawl by default; `export` and `status` work on an existing store.

use anyhow::{Context, Result};
use std::path::Path;

use crate::CrawlOpts;
use crate::engine::arg_parser::{Cli, Commands, CommonArgs};
use crate::engine::db_ops::open_db;
use crate::engine::handlers::{handle_crawl, handle_export, handle_status};
use crate::utils::{apply_env_to_opts, apply_file_to_opts, load_crawl_toml, setup_logging};

/// Layer defaults → config file → environment → command line.
pub fn build_opts(common: &CommonArgs, cwd: &Path) -> Result<CrawlOpts> {
    let mut opts = CrawlOpts::default();
    if let Some(file) = load_crawl_toml(common.config.as_deref(), cwd)? {
        apply_file_to_opts(&file, &mut opts);
    }
    apply_env_to_opts(cwd, &mut opts);
    common.apply_to(&mut opts);
    Ok(opts)
}

fn setup_opts(cli: &Cli) -> Result<CrawlOpts> {
    let cwd = std::env::current_dir().context("read working directory")?;
    let opts = build_opts(&cli.common, &cwd)?;
    setup_logging(opts.verbose, opts.log_file.as_deref())?;
    opts.validate().context("invalid configuration")?;
    Ok(opts)
}

/// Run the selected command. Failing to open the store is fatal; everything after that is
/// logged per item and never aborts the run.
pub async fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli)?;
    let db_path = opts.db_path();
    let conn = open_db(&db_path)
        .with_context(|| format!("cannot open crawl store {}", db_path.display()))?;

    match cli.command() {
        Commands::Run => handle_crawl(&conn, &opts).await,
        Commands::Export => handle_export(&conn, &opts),
        Commands::Status => handle_status(&conn),
    }
}
