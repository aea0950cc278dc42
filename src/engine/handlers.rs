//! Command handlers for run, export and status

use anyhow::Result;
use log::{info, warn};
use rusqlite::Connection;
use std::time::Duration;

use crate::CrawlOpts;
use crate::catalog::HttpCatalog;
use crate::crawl;
use crate::pipeline::export_ids;
use crate::status::{frontier_report, print_report};

/// Handle run command
pub async fn handle_crawl(conn: &Connection, opts: &CrawlOpts) -> Result<()> {
    info!("Starting crawl ...");
    let catalog = HttpCatalog::new(
        &opts.catalog_url,
        Duration::from_secs(opts.request_timeout_secs),
    )?;
    let summary = crawl(conn, &catalog, opts).await?;
    if !summary.failed_stages.is_empty() {
        warn!(
            "Finished with failed stages: {}",
            summary.failed_stages.join(", ")
        );
    }
    info!("Crawl finished: {} new apps this run", summary.crawled);
    Ok(())
}

/// Handle export command
pub fn handle_export(conn: &Connection, opts: &CrawlOpts) -> Result<()> {
    export_ids(conn, opts.export_filter(), &opts.export_path())?;
    Ok(())
}

/// Handle status command
pub fn handle_status(conn: &Connection) -> Result<()> {
    let report = frontier_report(conn)?;
    print_report(&report);
    Ok(())
}
