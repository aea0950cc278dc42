//! Metadata backfill: fetch detail records for frontier rows that have no info row yet.

use anyhow::Result;
use log::{debug, info, warn};
use std::cell::Cell;

use crate::catalog::Catalog;
use crate::engine::db_ops::{ids_missing_info, insert_info};
use crate::engine::progress::{finish_bar, stage_bar};
use crate::error::ItemError;

use super::batch::BatchExecutor;
use super::context::CrawlContext;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackfillReport {
    /// Ids selected by the set difference.
    pub pending: usize,
    pub saved: usize,
    pub fetch_failures: usize,
    /// Inserts rejected because the row already existed.
    pub duplicates: usize,
    pub store_failures: usize,
}

/// One `detail` call per id missing from the info table. Failures are logged and skipped;
/// the ids stay missing and are selected again by the next run.
pub async fn backfill_info<C: Catalog>(ctx: &CrawlContext<'_, C>) -> Result<BackfillReport> {
    let ids = ids_missing_info(ctx.conn)?;
    let executor = BatchExecutor::from_millis(ctx.opts.batch_size, ctx.opts.backfill_window_ms);
    let saved = Cell::new(0_usize);
    let fetch_failures = Cell::new(0_usize);
    let duplicates = Cell::new(0_usize);

    info!("Querying {} apps ...", ids.len());
    let bar = stage_bar(ctx.opts.progress, ids.len(), "Backfilling");

    let units = ids.iter().map(|id| {
        let (saved, fetch_failures, duplicates) = (&saved, &fetch_failures, &duplicates);
        async move {
            let detail = match ctx.catalog.detail(id, &ctx.locale).await {
                Ok(detail) => detail,
                Err(e) => {
                    warn!("Failed to fetch {}: {}", id, e);
                    fetch_failures.set(fetch_failures.get() + 1);
                    return Ok(());
                }
            };
            match insert_info(ctx.conn, &detail.into_record(id.as_str())) {
                Ok(()) => {
                    debug!("Saved package info for {}", id);
                    saved.set(saved.get() + 1);
                }
                Err(e) if e.is_duplicate() => {
                    warn!("Skipping {}: {}", id, e);
                    duplicates.set(duplicates.get() + 1);
                }
                Err(e) => return Err(ItemError::new(id.as_str(), e)),
            }
            Ok::<(), ItemError>(())
        }
    });

    let batch = executor.run(units, bar.as_ref()).await;
    finish_bar(bar.as_ref());

    Ok(BackfillReport {
        pending: ids.len(),
        saved: saved.get(),
        fetch_failures: fetch_failures.get(),
        duplicates: duplicates.get(),
        store_failures: batch.failed,
    })
}
