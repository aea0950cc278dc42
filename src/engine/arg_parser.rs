use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::CrawlOpts;

/// Breadth-first app catalog crawler with a rate-limited batch executor.
#[derive(Clone, Parser)]
#[command(name = "appcrawl")]
#[command(about = "Seed from ranked listings, expand over related apps, backfill details, export ids.")]
pub struct Cli {
    /// What to do. Default: run the full pipeline.
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Seed, expand, backfill and export (resumes from an existing store).
    Run,
    /// Only rewrite the export file from the existing store.
    Export,
    /// Print frontier counts per depth and status.
    Status,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }
}

#[derive(Clone, Default, Args)]
pub struct CommonArgs {
    /// Output directory for the store and the export file.
    #[arg(long, short = 'o', global = true)]
    pub output: Option<PathBuf>,

    /// Path to the crawl store. Default: `apps.db` in the output directory.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file. Default: `.appcrawl.toml` in the working directory, if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Country code for catalog calls.
    #[arg(long, short = 'c', global = true)]
    pub country: Option<String>,

    /// Language code for catalog calls.
    #[arg(long, global = true)]
    pub language: Option<String>,

    /// Export only free apps (false: only paid apps).
    #[arg(long, short = 'f', global = true, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub only_free: Option<bool>,

    /// Export only apps with at least this many installs.
    #[arg(long, short = 'i', global = true)]
    pub only_min_installs: Option<i64>,

    /// Crawl up to this many new apps.
    #[arg(long, short = 'm', global = true)]
    pub max: Option<u64>,

    /// Maximum BFS depth.
    #[arg(long, global = true)]
    pub max_depth: Option<u32>,

    /// Catalog calls per batch.
    #[arg(long, global = true)]
    pub batch_size: Option<usize>,

    /// Base URL of the catalog service.
    #[arg(long, global = true)]
    pub catalog_url: Option<String>,

    /// Also append log output to this file.
    #[arg(long, short = 'l', global = true)]
    pub log: Option<PathBuf>,

    /// Verbose output.
    #[arg(long, short = 'v', global = true, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Hide progress bars.
    #[arg(long, global = true)]
    pub no_progress: bool,
}

/// Overwrite opts field from the command line when given.
macro_rules! apply_cli_opt {
    ($args:expr, $opts:expr, $arg_field:ident => $opts_field:ident) => {
        if let Some(v) = $args.$arg_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

impl CommonArgs {
    /// Apply command-line values on top of file and env settings.
    pub fn apply_to(&self, opts: &mut CrawlOpts) {
        apply_cli_opt!(self, opts, output => output_dir);
        if let Some(ref db) = self.db {
            opts.db_path = Some(db.clone());
        }
        apply_cli_opt!(self, opts, country => region);
        apply_cli_opt!(self, opts, language => language);
        apply_cli_opt!(self, opts, only_free => only_free);
        apply_cli_opt!(self, opts, only_min_installs => only_min_installs);
        apply_cli_opt!(self, opts, max => max_apps);
        apply_cli_opt!(self, opts, max_depth => max_depth);
        apply_cli_opt!(self, opts, batch_size => batch_size);
        apply_cli_opt!(self, opts, catalog_url => catalog_url);
        if let Some(ref log) = self.log {
            opts.log_file = Some(log.clone());
        }
        apply_cli_opt!(self, opts, verbose => verbose);
        if self.no_progress {
            opts.progress = false;
        }
    }
}
