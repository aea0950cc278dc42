//! Info table: one detail row per id, written once by the backfill.

use rusqlite::{Connection, ErrorCode, params};

use crate::error::{StoreError, StoreResult};
use crate::{ExportFilter, InfoRecord};

use super::INSERT_INFO_SQL;

/// Insert one info row. A row that already exists yields [`StoreError::Duplicate`]; nothing is overwritten.
pub fn insert_info(conn: &Connection, record: &InfoRecord) -> StoreResult<()> {
    let detail = serde_json::to_string(&record.detail)?;
    let result = conn.execute(
        INSERT_INFO_SQL,
        params![
            record.id,
            record.install_range,
            record.min_installs,
            record.max_installs,
            record.is_free,
            detail
        ],
    );
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation =>
        {
            Err(StoreError::Duplicate {
                table: "info",
                id: record.id.clone(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Info rows with `is_free == filter.only_free` and `min_installs >= filter.min_installs`,
/// in storage order (no sorting).
pub fn query_info_by_filter(conn: &Connection, filter: ExportFilter) -> StoreResult<Vec<InfoRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, install_range, min_installs, max_installs, is_free, detail FROM info WHERE is_free = ?1 AND min_installs >= ?2",
    )?;
    let rows = stmt.query_map(params![filter.only_free, filter.min_installs], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, i64>(3)?,
            row.get::<_, bool>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;
    let mut records = Vec::new();
    for row in rows {
        let (id, install_range, min_installs, max_installs, is_free, detail) = row?;
        let detail = serde_json::from_str(&detail).map_err(|e| StoreError::Corrupt {
            id: id.clone(),
            reason: format!("detail: {e}"),
        })?;
        records.push(InfoRecord {
            id,
            install_range,
            min_installs,
            max_installs,
            is_free,
            detail,
        });
    }
    Ok(records)
}

/// Total info rows.
pub fn info_count(conn: &Connection) -> StoreResult<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM info", [], |row| row.get(0))?;
    Ok(n.max(0) as usize)
}
