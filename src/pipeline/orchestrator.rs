use log::{debug, error, info, warn};
use rusqlite::Connection;

use crate::CrawlOpts;
use crate::catalog::Catalog;
use crate::engine::db_ops::checkpoint;

use super::backfill::{BackfillReport, backfill_info};
use super::context::CrawlContext;
use super::expand::{ExpandReport, expand_frontier};
use super::export::export_ids;
use super::seed::{SeedReport, collect_seeds};

/// What a full run did. A stage that failed outright leaves its default report and is named
/// in `failed_stages`.
#[derive(Clone, Debug, Default)]
pub struct CrawlSummary {
    pub seed: SeedReport,
    pub expand: ExpandReport,
    pub backfill: BackfillReport,
    /// Ids written by the export, None when the export failed.
    pub exported: Option<usize>,
    /// Items newly inserted into the frontier during this run.
    pub crawled: u64,
    pub failed_stages: Vec<&'static str>,
}

/// Log a stage failure and fall back to an empty report so the next stage still runs.
fn stage_or_default<T: Default>(
    name: &'static str,
    result: anyhow::Result<T>,
    failed: &mut Vec<&'static str>,
) -> T {
    result.unwrap_or_else(|e| {
        error!("{} stage failed: {:#}", name, e);
        failed.push(name);
        T::default()
    })
}

/// Main orchestrator: seed → expand (level by level) → backfill → export.
/// No stage error aborts the run; each is logged and the next stage proceeds.
pub async fn run_crawl<C: Catalog>(
    conn: &Connection,
    catalog: &C,
    opts: &CrawlOpts,
) -> CrawlSummary {
    let ctx = CrawlContext::new(conn, catalog, opts);
    let mut failed = Vec::new();

    info!("Retrieving seed apps ...");
    let seed = stage_or_default("seed", collect_seeds(&ctx).await, &mut failed);
    info!(
        "Retrieved seed apps: {} new from {} pages ({} failed)",
        seed.inserted, seed.pages, seed.failed_pages
    );

    let expand = stage_or_default("expand", expand_frontier(&ctx).await, &mut failed);
    info!(
        "Got related apps: {} new, {} visited, {} errors",
        expand.inserted, expand.visited, expand.errors
    );

    info!("Retrieving app info ...");
    let backfill = stage_or_default("backfill", backfill_info(&ctx).await, &mut failed);
    info!(
        "Retrieved app info: {} saved, {} failed",
        backfill.saved,
        backfill.fetch_failures + backfill.store_failures
    );

    info!("Saving to CSV ...");
    let exported = match export_ids(conn, opts.export_filter(), &opts.export_path()) {
        Ok(ids) => Some(ids.len()),
        Err(e) => {
            error!("export stage failed: {:#}", e);
            failed.push("export");
            None
        }
    };

    if let Err(e) = checkpoint(conn) {
        warn!("{:#}", e);
    }

    let summary = CrawlSummary {
        seed,
        expand,
        backfill,
        exported,
        crawled: ctx.budget().crawled(),
        failed_stages: failed,
    };
    debug!("{:#?}", summary);
    summary
}
