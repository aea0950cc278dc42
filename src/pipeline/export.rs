//! Export: filtered info ids written newline-joined to the output file.

use anyhow::{Context, Result};
use log::info;
use rusqlite::Connection;
use std::path::Path;

use crate::ExportFilter;
use crate::engine::db_ops::query_info_by_filter;
use crate::error::StoreResult;
use crate::utils::write_replacing;

/// Ids of info rows matching `filter`, in storage order.
pub fn select_export_ids(conn: &Connection, filter: ExportFilter) -> StoreResult<Vec<String>> {
    Ok(query_info_by_filter(conn, filter)?
        .into_iter()
        .map(|record| record.id)
        .collect())
}

/// Write the matching ids to `path`, replacing any previous export. Returns the ids written.
pub fn export_ids(conn: &Connection, filter: ExportFilter, path: &Path) -> Result<Vec<String>> {
    let ids = select_export_ids(conn, filter).context("query export rows")?;
    info!(
        "Found {} apps (free: {}) with at least {} installs",
        ids.len(),
        filter.only_free,
        filter.min_installs
    );
    write_replacing(path, ids.join("\n").as_bytes())?;
    info!("Saved {} apps to {}", ids.len(), path.display());
    Ok(ids)
}
