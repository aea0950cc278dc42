//! Appcrawl: breadth-first app catalog crawler with a rate-limited batch executor

pub mod catalog;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod status;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{FetchError, ItemError, StoreError};

use log::debug;
use rusqlite::Connection;

use crate::catalog::Catalog;
use crate::pipeline::CrawlSummary;

/// Result alias used by public appcrawl API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: validate `opts`, then seed, expand, backfill and export against `conn`
/// using any [`Catalog`] implementation.
///
/// Only invalid options are an error; per-item and per-stage failures are logged and reported in
/// the returned [`CrawlSummary`].
pub async fn crawl<C: Catalog>(
    conn: &Connection,
    catalog: &C,
    opts: &CrawlOpts,
) -> Result<CrawlSummary> {
    opts.validate()?;
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    debug!("{}", config_str);
    Ok(pipeline::run_crawl(conn, catalog, opts).await)
}
