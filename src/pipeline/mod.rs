//! Pipeline components: crawl context, batch executor, and the four stages.

pub mod backfill;
pub mod batch;
pub mod context;
pub mod expand;
pub mod export;
pub mod orchestrator;
pub mod seed;

pub use backfill::{BackfillReport, backfill_info};
pub use batch::{BatchExecutor, BatchReport};
pub use context::{CrawlBudget, CrawlContext, Discovery};
pub use expand::{ExpandReport, expand_frontier};
pub use export::{export_ids, select_export_ids};
pub use orchestrator::{CrawlSummary, run_crawl};
pub use seed::{SeedReport, collect_seeds, seed_queries};
