//! Seed collection: ranked listing pages inserted at depth 0.

use anyhow::Result;
use log::{debug, info, warn};
use std::cell::Cell;

use crate::catalog::Catalog;
use crate::engine::progress::{finish_bar, stage_bar};
use crate::error::ItemError;
use crate::utils::config::{CATEGORIES, COLLECTIONS};
use crate::{CrawlOpts, ListQuery};

use super::batch::BatchExecutor;
use super::context::CrawlContext;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Listing calls issued.
    pub pages: usize,
    pub failed_pages: usize,
    /// Pages never requested because the budget was met.
    pub skipped_pages: usize,
    /// New frontier rows.
    pub inserted: usize,
}

/// Every (category, collection) pair to seed from, category-major. Empty lists in `opts`
/// mean the full taxonomy.
pub fn seed_queries(opts: &CrawlOpts) -> Vec<ListQuery> {
    let categories: Vec<&str> = if opts.categories.is_empty() {
        CATEGORIES.to_vec()
    } else {
        opts.categories.iter().map(String::as_str).collect()
    };
    let collections: Vec<&str> = if opts.collections.is_empty() {
        COLLECTIONS.to_vec()
    } else {
        opts.collections.iter().map(String::as_str).collect()
    };
    let locale = opts.locale();

    categories
        .iter()
        .flat_map(|category| {
            collections.iter().map(|collection| ListQuery {
                category: category.to_string(),
                collection: collection.to_string(),
                page_size: opts.seed_page_size,
                locale: locale.clone(),
            })
        })
        .collect()
}

/// Fetch every listing page and insert its items at depth 0. A failed page is logged and
/// skipped. Stops launching pages once the budget is met; the last page is truncated to fit.
pub async fn collect_seeds<C: Catalog>(ctx: &CrawlContext<'_, C>) -> Result<SeedReport> {
    let queries = seed_queries(ctx.opts);
    let executor = BatchExecutor::from_millis(ctx.opts.batch_size, ctx.opts.seed_window_ms);
    let failed = Cell::new(0_usize);
    let inserted = Cell::new(0_usize);

    info!("Seeding from {} listing pages", queries.len());
    let bar = stage_bar(ctx.opts.progress, queries.len(), "Seeding");

    let units = queries.iter().map(|query| {
        let failed = &failed;
        let inserted = &inserted;
        async move {
            let items = match ctx.catalog.list(query).await {
                Ok(items) => items,
                Err(e) => {
                    warn!(
                        "Failed to fetch {} / {}: {}",
                        query.category, query.collection, e
                    );
                    failed.set(failed.get() + 1);
                    return Ok(());
                }
            };
            let n = ctx.seed_page(&items).map_err(|e| {
                ItemError::new(format!("{} / {}", query.category, query.collection), e)
            })?;
            inserted.set(inserted.get() + n);
            debug!(
                "{} / {}: {} items, {} new",
                query.category,
                query.collection,
                items.len(),
                n
            );
            Ok::<(), ItemError>(())
        }
    });

    let batch = executor
        .run_until(units, || ctx.budget().is_exhausted(), bar.as_ref())
        .await;
    finish_bar(bar.as_ref());

    if batch.skipped > 0 {
        info!(
            "Budget of {} reached, skipped {} listing pages",
            ctx.budget().limit(),
            batch.skipped
        );
    }

    Ok(SeedReport {
        pages: batch.executed(),
        failed_pages: failed.get(),
        skipped_pages: batch.skipped,
        inserted: inserted.get(),
    })
}
