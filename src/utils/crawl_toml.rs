//! Load `.appcrawl.toml` (CLI only). Library callers build [`CrawlOpts`] themselves.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::CrawlOpts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct CrawlToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    region: Option<String>,
    language: Option<String>,
    output: Option<String>,
    db_path: Option<String>,
    only_free: Option<bool>,
    only_min_installs: Option<i64>,
    max: Option<u64>,
    max_depth: Option<u32>,
    batch_size: Option<usize>,
    seed_window_ms: Option<u64>,
    expand_window_ms: Option<u64>,
    backfill_window_ms: Option<u64>,
    seed_page_size: Option<usize>,
    catalog_url: Option<String>,
    request_timeout_secs: Option<u64>,
    categories: Option<Vec<String>>,
    collections: Option<Vec<String>>,
    verbose: Option<bool>,
    log: Option<String>,
    progress: Option<bool>,
}

/// Parse config text.
pub fn parse_crawl_toml(text: &str) -> Result<CrawlToml> {
    toml::from_str(text).context("parse crawl config")
}

/// Load the config file. An explicit path must exist; the default `.appcrawl.toml`
/// in `dir` is optional and returns None when missing.
pub fn load_crawl_toml(explicit: Option<&Path>, dir: &Path) -> Result<Option<CrawlToml>> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (dir.join(PackagePaths::get().config_filename()), false),
    };
    if !required && !path.is_file() {
        return Ok(None);
    }
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let file = parse_crawl_toml(&text).with_context(|| path.display().to_string())?;
    log::debug!("Loaded config from {}", path.display());
    Ok(Some(file))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $idx_field:ident => $opts_field:ident) => {
        if let Some(v) = $idx.$idx_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before env and CLI.
pub fn apply_file_to_opts(file: &CrawlToml, opts: &mut CrawlOpts) {
    let s = &file.settings;
    apply_file_opt!(s, opts, region => region);
    apply_file_opt!(s, opts, language => language);
    if let Some(ref p) = s.output {
        opts.output_dir = PathBuf::from(p);
    }
    if let Some(ref p) = s.db_path {
        opts.db_path = Some(PathBuf::from(p));
    }
    apply_file_opt!(s, opts, only_free => only_free);
    apply_file_opt!(s, opts, only_min_installs => only_min_installs);
    apply_file_opt!(s, opts, max => max_apps);
    apply_file_opt!(s, opts, max_depth => max_depth);
    apply_file_opt!(s, opts, batch_size => batch_size);
    apply_file_opt!(s, opts, seed_window_ms => seed_window_ms);
    apply_file_opt!(s, opts, expand_window_ms => expand_window_ms);
    apply_file_opt!(s, opts, backfill_window_ms => backfill_window_ms);
    apply_file_opt!(s, opts, seed_page_size => seed_page_size);
    apply_file_opt!(s, opts, catalog_url => catalog_url);
    apply_file_opt!(s, opts, request_timeout_secs => request_timeout_secs);
    apply_file_opt!(s, opts, categories => categories);
    apply_file_opt!(s, opts, collections => collections);
    apply_file_opt!(s, opts, verbose => verbose);
    if let Some(ref p) = s.log {
        opts.log_file = Some(PathBuf::from(p));
    }
    apply_file_opt!(s, opts, progress => progress);
}
