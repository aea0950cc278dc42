//! Environment overrides: process env → `.env` in the working directory.

use log::debug;
use std::path::Path;

use crate::CrawlOpts;
use crate::utils::config::PackagePaths;

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Read `APPCRAWL_<key>` from the environment, falling back to `.env` in `dir`.
pub fn env_override(dir: &Path, key: &str) -> Option<String> {
    let name = PackagePaths::get().env_var(key);
    if let Some(s) = non_empty_var(&name) {
        return Some(s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        return non_empty_var(&name);
    }
    None
}

/// Apply environment overrides to opts. Call after the config file, before the CLI.
pub fn apply_env_to_opts(dir: &Path, opts: &mut CrawlOpts) {
    if let Some(url) = env_override(dir, "CATALOG_URL") {
        debug!("Catalog url from environment: {}", url);
        opts.catalog_url = url;
    }
    if let Some(region) = env_override(dir, "REGION") {
        opts.region = region;
    }
}
