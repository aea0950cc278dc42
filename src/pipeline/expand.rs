//! Breadth-first expansion over related-item edges.
//!
//! Each level `d` selects the unvisited rows at depth `d`, asks the catalog for their related
//! items, inserts unseen ones at `d + 1`, then marks the source row. Discovery (insert) and
//! exploration (status) are separate, so a restarted crawl picks up exactly the rows whose
//! neighbourhood was never fetched.

use anyhow::Result;
use log::{debug, info, warn};
use std::cell::Cell;

use crate::catalog::Catalog;
use crate::engine::db_ops::{mark_status, query_by_depth_and_status, row_exists};
use crate::engine::progress::{finish_bar, stage_bar};
use crate::error::{ItemError, StoreResult};
use crate::{FrontierEntry, FrontierStatus};

use super::batch::BatchExecutor;
use super::context::{CrawlContext, Discovery};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpandReport {
    /// Depth levels that had unvisited rows and were run.
    pub levels_run: u32,
    pub similar_calls: usize,
    pub visited: usize,
    pub errors: usize,
    /// Rows left unvisited because the budget ran out mid-neighbourhood.
    pub truncated: usize,
    /// Rows not expanded because the budget was met before their turn.
    pub skipped: usize,
    /// Work units that failed on a store error (row stays unvisited).
    pub store_failures: usize,
    pub inserted: usize,
    pub budget_exhausted: bool,
}

/// Per-level tallies, bumped by work units on the same task.
#[derive(Default)]
struct LevelTally {
    calls: Cell<usize>,
    visited: Cell<usize>,
    errors: Cell<usize>,
    truncated: Cell<usize>,
    skipped: Cell<usize>,
    inserted: Cell<usize>,
}

fn bump(cell: &Cell<usize>, n: usize) {
    cell.set(cell.get() + n);
}

/// Explore one row: `similar`, insert unseen neighbours at `depth + 1`, mark the row.
async fn expand_one<C: Catalog>(
    ctx: &CrawlContext<'_, C>,
    entry: &FrontierEntry,
    tally: &LevelTally,
) -> StoreResult<()> {
    if ctx.budget().is_exhausted() {
        bump(&tally.skipped, 1);
        return Ok(());
    }

    bump(&tally.calls, 1);
    let neighbours = match ctx.catalog.similar(&entry.id, &ctx.locale).await {
        Ok(items) => items,
        Err(e) => {
            warn!("Failed to fetch similar apps for {}: {}", entry.id, e);
            mark_status(ctx.conn, &entry.id, FrontierStatus::Error)?;
            bump(&tally.errors, 1);
            return Ok(());
        }
    };

    let next_depth = entry.depth + 1;
    let mut complete = true;
    for item in &neighbours {
        if row_exists(ctx.conn, &item.id)? {
            continue;
        }
        match ctx.discover(&item.id, next_depth, &item.raw)? {
            Discovery::Inserted => bump(&tally.inserted, 1),
            Discovery::Known => {}
            Discovery::OverBudget => {
                complete = false;
                break;
            }
        }
    }

    if complete {
        mark_status(ctx.conn, &entry.id, FrontierStatus::Visited)?;
        bump(&tally.visited, 1);
    } else {
        debug!(
            "Budget reached while expanding {}; left unvisited for a later run",
            entry.id
        );
        bump(&tally.truncated, 1);
    }
    Ok(())
}

/// Run levels `0..max_depth` in order. A level's discoveries are all persisted before the next
/// level is queried. Stops early once the budget is met.
pub async fn expand_frontier<C: Catalog>(ctx: &CrawlContext<'_, C>) -> Result<ExpandReport> {
    let executor = BatchExecutor::from_millis(ctx.opts.batch_size, ctx.opts.expand_window_ms);
    let mut report = ExpandReport::default();

    for depth in 0..ctx.opts.max_depth {
        let pending = query_by_depth_and_status(ctx.conn, depth, FrontierStatus::Unvisited)?;

        if ctx.budget().is_exhausted() {
            info!(
                "Already crawled {} apps, stopping ...",
                ctx.budget().crawled()
            );
            report.budget_exhausted = true;
            break;
        }

        info!("Apps at depth {}: {}", depth, pending.len());
        if pending.is_empty() {
            continue;
        }

        let tally = LevelTally::default();
        let bar = stage_bar(ctx.opts.progress, pending.len(), "Expanding");
        let units = pending.iter().map(|entry| {
            let tally = &tally;
            async move {
                expand_one(ctx, entry, tally)
                    .await
                    .map_err(|e| ItemError::new(entry.id.as_str(), e))
            }
        });
        let batch = executor
            .run_until(units, || ctx.budget().is_exhausted(), bar.as_ref())
            .await;
        finish_bar(bar.as_ref());

        report.levels_run += 1;
        report.similar_calls += tally.calls.get();
        report.visited += tally.visited.get();
        report.errors += tally.errors.get();
        report.truncated += tally.truncated.get();
        report.skipped += tally.skipped.get() + batch.skipped;
        report.store_failures += batch.failed;
        report.inserted += tally.inserted.get();

        debug!(
            "Depth {} done: {} visited, {} errors, {} new at depth {}",
            depth,
            tally.visited.get(),
            tally.errors.get(),
            tally.inserted.get(),
            depth + 1
        );
    }

    if !report.budget_exhausted && ctx.budget().is_exhausted() {
        report.budget_exhausted = true;
    }
    Ok(report)
}
