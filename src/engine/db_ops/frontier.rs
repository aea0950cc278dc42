//! Frontier table: discovered ids with their BFS depth and traversal status.

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::{CatalogItem, DepthCount, FrontierEntry, FrontierStatus};

use super::INSERT_FRONTIER_SQL;

/// Insert `id` at `depth` unless a row already exists. Returns true when a row was created.
/// A rediscovered id keeps the depth and snapshot of its first insert.
pub fn insert_if_absent(
    conn: &Connection,
    id: &str,
    depth: u32,
    snapshot: &Value,
) -> StoreResult<bool> {
    let text = serde_json::to_string(snapshot)?;
    let changed = conn.execute(INSERT_FRONTIER_SQL, params![id, depth, text])?;
    Ok(changed > 0)
}

/// Insert a listing page at depth 0 in one transaction. Returns the number of new rows
/// (ids already present, or repeated within the page, are not counted).
pub fn insert_seed_page(conn: &Connection, items: &[CatalogItem]) -> StoreResult<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0_usize;
    {
        let mut stmt = tx.prepare_cached(INSERT_FRONTIER_SQL)?;
        for item in items {
            let text = serde_json::to_string(&item.raw)?;
            inserted += stmt.execute(params![item.id, 0_u32, text])?;
        }
    }
    tx.commit()?;
    Ok(inserted)
}

/// Move an unvisited row to `status`. Returns false when the row is missing or already terminal;
/// terminal rows are never changed.
pub fn mark_status(conn: &Connection, id: &str, status: FrontierStatus) -> StoreResult<bool> {
    let changed = conn.execute(
        "UPDATE frontier SET status = ?1 WHERE id = ?2 AND status = ?3",
        params![status.code(), id, FrontierStatus::Unvisited.code()],
    )?;
    Ok(changed > 0)
}

fn decode_status(id: &str, code: i64) -> StoreResult<FrontierStatus> {
    FrontierStatus::from_code(code).ok_or_else(|| StoreError::Corrupt {
        id: id.to_string(),
        reason: format!("unknown status {code}"),
    })
}

/// All rows at `depth` with `status`, in insertion order.
pub fn query_by_depth_and_status(
    conn: &Connection,
    depth: u32,
    status: FrontierStatus,
) -> StoreResult<Vec<FrontierEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, depth, status, snapshot FROM frontier WHERE depth = ?1 AND status = ?2",
    )?;
    let rows = stmt.query_map(params![depth, status.code()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, u32>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;
    let mut entries = Vec::new();
    for row in rows {
        let (id, depth, code, snapshot) = row?;
        let status = decode_status(&id, code)?;
        let snapshot = serde_json::from_str(&snapshot).map_err(|e| StoreError::Corrupt {
            id: id.clone(),
            reason: format!("snapshot: {e}"),
        })?;
        entries.push(FrontierEntry {
            id,
            depth,
            status,
            snapshot,
        });
    }
    Ok(entries)
}

/// True if the frontier already holds `id`.
pub fn row_exists(conn: &Connection, id: &str) -> StoreResult<bool> {
    let found = conn
        .query_row("SELECT 1 FROM frontier WHERE id = ?1", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// Frontier ids with no info row yet, in frontier insertion order.
pub fn ids_missing_info(conn: &Connection) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT f.id FROM frontier f WHERE NOT EXISTS (SELECT 1 FROM info i WHERE i.id = f.id) ORDER BY f.rowid",
    )?;
    let ids = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Number of frontier rows with no info row. Info rows without a frontier row are not counted.
pub fn missing_info_count(conn: &Connection) -> StoreResult<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM frontier f WHERE NOT EXISTS (SELECT 1 FROM info i WHERE i.id = f.id)",
        [],
        |row| row.get(0),
    )?;
    Ok(n.max(0) as usize)
}

/// Row counts grouped by (depth, status), ordered by depth.
pub fn frontier_summary(conn: &Connection) -> StoreResult<Vec<DepthCount>> {
    let mut stmt = conn.prepare(
        "SELECT depth, status, COUNT(*) FROM frontier GROUP BY depth, status ORDER BY depth, status DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, u32>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, i64>(2)?,
        ))
    })?;
    let mut summary = Vec::new();
    for row in rows {
        let (depth, code, count) = row?;
        summary.push(DepthCount {
            depth,
            status: decode_status(&format!("depth {depth}"), code)?,
            count: count.max(0) as usize,
        });
    }
    Ok(summary)
}

/// Total frontier rows.
pub fn frontier_count(conn: &Connection) -> StoreResult<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM frontier", [], |row| row.get(0))?;
    Ok(n.max(0) as usize)
}
