//! Public and internal types for the appcrawl API and pipeline.

use anyhow::{Context, bail};
use serde_json::Value;
use std::path::PathBuf;

use crate::utils::config::{CrawlDefaults, PackagePaths};

/// Traversal status of a frontier row. Stored as an integer: 0 unvisited, 1 visited, -2 error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrontierStatus {
    /// Discovered; neighbourhood not explored yet.
    Unvisited,
    /// `similar` succeeded and every returned neighbour was recorded.
    Visited,
    /// `similar` failed. Terminal, never retried.
    Error,
}

impl FrontierStatus {
    pub const fn code(self) -> i64 {
        match self {
            FrontierStatus::Unvisited => 0,
            FrontierStatus::Visited => 1,
            FrontierStatus::Error => -2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(FrontierStatus::Unvisited),
            1 => Some(FrontierStatus::Visited),
            -2 => Some(FrontierStatus::Error),
            _ => None,
        }
    }
}

/// One discovered item. `depth` and `snapshot` are fixed at insert time.
#[derive(Clone, Debug, PartialEq)]
pub struct FrontierEntry {
    pub id: String,
    pub depth: u32,
    pub status: FrontierStatus,
    /// Raw listing / similar payload captured when the item was first seen.
    pub snapshot: Value,
}

/// Fully fetched metadata for one item (same shape as a row in the `info` table).
#[derive(Clone, Debug, PartialEq)]
pub struct InfoRecord {
    pub id: String,
    /// Human readable range as reported by the catalog, e.g. `"1,000,000+"`.
    pub install_range: String,
    pub min_installs: i64,
    pub max_installs: i64,
    pub is_free: bool,
    pub detail: Value,
}

/// Item as returned by `list` and `similar`.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogItem {
    pub id: String,
    pub raw: Value,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, raw: Value) -> Self {
        Self { id: id.into(), raw }
    }
}

/// Detail payload as returned by `detail`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppDetail {
    pub install_range: String,
    pub min_installs: i64,
    pub max_installs: i64,
    pub is_free: bool,
    pub raw: Value,
}

impl AppDetail {
    pub fn into_record(self, id: impl Into<String>) -> InfoRecord {
        InfoRecord {
            id: id.into(),
            install_range: self.install_range,
            min_installs: self.min_installs,
            max_installs: self.max_installs,
            is_free: self.is_free,
            detail: self.raw,
        }
    }
}

/// Language and region sent with every catalog call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locale {
    pub language: String,
    pub region: String,
}

/// Parameters for one ranked listing page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub category: String,
    pub collection: String,
    pub page_size: usize,
    pub locale: Locale,
}

/// Export filter: `is_free == only_free AND min_installs >= min_installs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportFilter {
    pub only_free: bool,
    pub min_installs: i64,
}

/// One line of the frontier summary: how many rows sit at (depth, status).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthCount {
    pub depth: u32,
    pub status: FrontierStatus,
    pub count: usize,
}

/// Full crawl options (defaults, then file, then env, then CLI).
#[derive(Clone, Debug)]
pub struct CrawlOpts {
    /// Catalog country code.
    pub region: String,
    /// Catalog language code.
    pub language: String,
    /// Directory holding the store and the export file.
    pub output_dir: PathBuf,
    /// Store path. When None, uses `output_dir.join(<package db filename>)`.
    pub db_path: Option<PathBuf>,
    /// Export only free (true) or only paid (false) items.
    pub only_free: bool,
    /// Export only items with at least this many installs.
    pub only_min_installs: i64,
    /// Crawl budget: newly discovered items per process run.
    pub max_apps: u64,
    /// BFS depth limit. Levels `0..max_depth` are expanded.
    pub max_depth: u32,
    /// Work units per batch (max concurrent catalog calls).
    pub batch_size: usize,
    pub seed_window_ms: u64,
    pub expand_window_ms: u64,
    pub backfill_window_ms: u64,
    /// Items requested per ranked listing page.
    pub seed_page_size: usize,
    /// Base URL of the catalog HTTP service.
    pub catalog_url: String,
    pub request_timeout_secs: u64,
    /// Seed categories. Empty means the full taxonomy.
    pub categories: Vec<String>,
    /// Seed collections. Empty means every collection.
    pub collections: Vec<String>,
    pub verbose: bool,
    /// Append log records to this file as well as stderr.
    pub log_file: Option<PathBuf>,
    /// Show per-stage progress bars.
    pub progress: bool,
}

impl Default for CrawlOpts {
    fn default() -> Self {
        Self {
            region: CrawlDefaults::REGION.to_string(),
            language: CrawlDefaults::LANGUAGE.to_string(),
            output_dir: PathBuf::from("."),
            db_path: None,
            only_free: false,
            only_min_installs: 0,
            max_apps: CrawlDefaults::MAX_APPS,
            max_depth: CrawlDefaults::MAX_DEPTH,
            batch_size: CrawlDefaults::BATCH_SIZE,
            seed_window_ms: CrawlDefaults::SEED_WINDOW_MS,
            expand_window_ms: CrawlDefaults::EXPAND_WINDOW_MS,
            backfill_window_ms: CrawlDefaults::BACKFILL_WINDOW_MS,
            seed_page_size: CrawlDefaults::SEED_PAGE_SIZE,
            catalog_url: CrawlDefaults::CATALOG_URL.to_string(),
            request_timeout_secs: CrawlDefaults::REQUEST_TIMEOUT_SECS,
            categories: Vec::new(),
            collections: Vec::new(),
            verbose: false,
            log_file: None,
            progress: true,
        }
    }
}

impl CrawlOpts {
    /// Store path, defaulting to the package db filename in the output directory.
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.output_dir.join(PackagePaths::get().db_filename()))
    }

    /// Destination of the exported id list.
    pub fn export_path(&self) -> PathBuf {
        self.output_dir.join(PackagePaths::get().export_filename())
    }

    pub fn locale(&self) -> Locale {
        Locale {
            language: self.language.clone(),
            region: self.region.clone(),
        }
    }

    pub fn export_filter(&self) -> ExportFilter {
        ExportFilter {
            only_free: self.only_free,
            min_installs: self.only_min_installs,
        }
    }

    /// Reject settings the pipeline cannot run with. Called once at startup.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.region.trim().is_empty() {
            bail!("region must not be empty");
        }
        if self.language.trim().is_empty() {
            bail!("language must not be empty");
        }
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if self.seed_page_size == 0 {
            bail!("seed_page_size must be at least 1");
        }
        if self.seed_window_ms == 0 || self.expand_window_ms == 0 || self.backfill_window_ms == 0 {
            bail!("batch windows must be at least 1 ms");
        }
        if self.only_min_installs < 0 {
            bail!("only_min_installs must not be negative");
        }
        reqwest::Url::parse(&self.catalog_url)
            .with_context(|| format!("invalid catalog url '{}'", self.catalog_url))?;
        Ok(())
    }
}
