//! Crawl context: store, catalog, options and the crawl budget shared by every stage.

use rusqlite::Connection;
use serde_json::Value;
use std::cell::Cell;

use crate::catalog::Catalog;
use crate::engine::db_ops;
use crate::error::StoreResult;
use crate::{CatalogItem, CrawlOpts, Locale};

/// Count of items newly inserted during this run against the configured maximum.
///
/// All work units run on one task, so a `Cell` is enough; the count is bumped synchronously
/// right after a successful insert and never across an await.
#[derive(Debug)]
pub struct CrawlBudget {
    limit: u64,
    crawled: Cell<u64>,
}

impl CrawlBudget {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            crawled: Cell::new(0),
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn crawled(&self) -> u64 {
        self.crawled.get()
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.crawled.get())
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn record(&self, n: u64) {
        self.crawled.set(self.crawled.get() + n);
    }
}

/// Result of offering one discovered item to the frontier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discovery {
    /// New row created and counted against the budget.
    Inserted,
    /// Id was already in the frontier; nothing changed.
    Known,
    /// Budget already spent; nothing was written.
    OverBudget,
}

/// Shared state for the seed, expand and backfill stages.
pub struct CrawlContext<'a, C> {
    pub conn: &'a Connection,
    pub catalog: &'a C,
    pub opts: &'a CrawlOpts,
    pub locale: Locale,
    budget: CrawlBudget,
}

impl<'a, C: Catalog> CrawlContext<'a, C> {
    pub fn new(conn: &'a Connection, catalog: &'a C, opts: &'a CrawlOpts) -> Self {
        Self {
            conn,
            catalog,
            opts,
            locale: opts.locale(),
            budget: CrawlBudget::new(opts.max_apps),
        }
    }

    pub fn budget(&self) -> &CrawlBudget {
        &self.budget
    }

    /// Insert a discovered item at `depth` if the budget allows. The only place BFS inserts
    /// touch the counter.
    pub fn discover(&self, id: &str, depth: u32, snapshot: &Value) -> StoreResult<Discovery> {
        if self.budget.is_exhausted() {
            return Ok(Discovery::OverBudget);
        }
        if db_ops::insert_if_absent(self.conn, id, depth, snapshot)? {
            self.budget.record(1);
            Ok(Discovery::Inserted)
        } else {
            Ok(Discovery::Known)
        }
    }

    /// Insert a listing page at depth 0, truncated to the remaining allowance first.
    /// Returns the number of new rows.
    pub fn seed_page(&self, items: &[CatalogItem]) -> StoreResult<usize> {
        let allowance = usize::try_from(self.budget.remaining()).unwrap_or(usize::MAX);
        let page = &items[..items.len().min(allowance)];
        if page.is_empty() {
            return Ok(0);
        }
        let inserted = db_ops::insert_seed_page(self.conn, page)?;
        self.budget.record(inserted as u64);
        Ok(inserted)
    }
}
