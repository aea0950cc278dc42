//! Database operations: schema, open, frontier table, info table.

mod connection;
mod frontier;
mod info;

pub use connection::{checkpoint, open_db, open_db_in_memory};
pub use frontier::{
    frontier_count, frontier_summary, ids_missing_info, insert_if_absent, insert_seed_page,
    mark_status, missing_info_count, query_by_depth_and_status, row_exists,
};
pub use info::{info_count, insert_info, query_info_by_filter};

/// WAL tuning pragmas (synchronous, autocheckpoint, size limit). Use after PRAGMA journal_mode = WAL.
pub(crate) const WAL_PRAGMAS: &str = r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA wal_autocheckpoint = 10000;
        PRAGMA journal_size_limit = 67108864;
        "#;

/// Insert-if-absent for the frontier. Depth and snapshot of an existing row are never touched.
pub(crate) const INSERT_FRONTIER_SQL: &str = "INSERT INTO frontier (id, depth, status, snapshot) VALUES (?1, ?2, 0, ?3) ON CONFLICT(id) DO NOTHING";

/// Plain insert for info rows; a second insert for the same id fails on the primary key.
pub(crate) const INSERT_INFO_SQL: &str = "INSERT INTO info (id, install_range, min_installs, max_installs, is_free, detail) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

/// Schema for frontier and info tables. Info rows are keyed independently of the frontier.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS frontier (
    id TEXT PRIMARY KEY,
    depth INTEGER NOT NULL,
    status INTEGER NOT NULL DEFAULT 0,
    snapshot TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_frontier_depth_status ON frontier(depth, status);

CREATE TABLE IF NOT EXISTS info (
    id TEXT PRIMARY KEY,
    install_range TEXT NOT NULL,
    min_installs INTEGER NOT NULL,
    max_installs INTEGER NOT NULL,
    is_free INTEGER NOT NULL,
    detail TEXT NOT NULL
);
"#;
