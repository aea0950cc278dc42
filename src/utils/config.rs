//! Application configuration constants.
//! Defaults, filenames and the seed taxonomy in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived paths: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
    env_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache paths from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
                env_prefix: pkg.to_uppercase(),
            }
        })
    }

    pub fn db_filename(&self) -> &str {
        "apps.db"
    }

    pub fn export_filename(&self) -> &str {
        "apps.csv"
    }

    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable name for `key`, e.g. `APPCRAWL_CATALOG_URL`.
    pub fn env_var(&self, key: &str) -> String {
        format!("{}_{}", self.env_prefix, key)
    }
}

// ---- Crawl defaults ----

/// Defaults applied before the config file, environment and CLI.
pub struct CrawlDefaults;

impl CrawlDefaults {
    pub const REGION: &'static str = "at";
    pub const LANGUAGE: &'static str = "en";
    /// Effectively unbounded.
    pub const MAX_APPS: u64 = 999_999_999;
    pub const MAX_DEPTH: u32 = 9;
    /// 25 calls per batch keeps the catalog's advertised call rate.
    pub const BATCH_SIZE: usize = 25;
    pub const SEED_WINDOW_MS: u64 = 1000;
    pub const EXPAND_WINDOW_MS: u64 = 700;
    pub const BACKFILL_WINDOW_MS: u64 = 1000;
    pub const SEED_PAGE_SIZE: usize = 200;
    pub const CATALOG_URL: &'static str = "http://localhost:3000";
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

// ---- Seed taxonomy ----

/// Ranked collections queried for every category.
pub const COLLECTIONS: &[&str] = &["TOP_FREE", "TOP_PAID", "GROSSING"];

/// Store categories queried during seeding.
pub const CATEGORIES: &[&str] = &[
    "APPLICATION",
    "ANDROID_WEAR",
    "ART_AND_DESIGN",
    "AUTO_AND_VEHICLES",
    "BEAUTY",
    "BOOKS_AND_REFERENCE",
    "BUSINESS",
    "COMICS",
    "COMMUNICATION",
    "DATING",
    "EDUCATION",
    "ENTERTAINMENT",
    "EVENTS",
    "FINANCE",
    "FOOD_AND_DRINK",
    "HEALTH_AND_FITNESS",
    "HOUSE_AND_HOME",
    "LIBRARIES_AND_DEMO",
    "LIFESTYLE",
    "MAPS_AND_NAVIGATION",
    "MEDICAL",
    "MUSIC_AND_AUDIO",
    "NEWS_AND_MAGAZINES",
    "PARENTING",
    "PERSONALIZATION",
    "PHOTOGRAPHY",
    "PRODUCTIVITY",
    "SHOPPING",
    "SOCIAL",
    "SPORTS",
    "TOOLS",
    "TRAVEL_AND_LOCAL",
    "VIDEO_PLAYERS",
    "WATCH_FACE",
    "WEATHER",
    "GAME",
    "GAME_ACTION",
    "GAME_ADVENTURE",
    "GAME_ARCADE",
    "GAME_BOARD",
    "GAME_CARD",
    "GAME_CASINO",
    "GAME_CASUAL",
    "GAME_EDUCATIONAL",
    "GAME_MUSIC",
    "GAME_PUZZLE",
    "GAME_RACING",
    "GAME_ROLE_PLAYING",
    "GAME_SIMULATION",
    "GAME_SPORTS",
    "GAME_STRATEGY",
    "GAME_TRIVIA",
    "GAME_WORD",
    "FAMILY",
];
