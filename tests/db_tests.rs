//! DB tests: frontier insert-if-absent, status transitions, missing-info set, info inserts and
//! the export filter.

use appcrawl::engine::db_ops::{
    frontier_count, frontier_summary, ids_missing_info, info_count, insert_if_absent, insert_info,
    insert_seed_page, mark_status, query_by_depth_and_status, query_info_by_filter, row_exists,
};
use appcrawl::engine::{open_db, open_db_in_memory};
use appcrawl::{CatalogItem, DepthCount, ExportFilter, FrontierStatus, InfoRecord, StoreError};
use serde_json::json;

fn info(id: &str, min_installs: i64, is_free: bool) -> InfoRecord {
    InfoRecord {
        id: id.to_string(),
        install_range: format!("{}+", min_installs),
        min_installs,
        max_installs: min_installs * 5,
        is_free,
        detail: json!({ "appId": id }),
    }
}

#[test]
fn test_insert_if_absent_keeps_first_depth() {
    let conn = open_db_in_memory().unwrap();
    assert!(insert_if_absent(&conn, "a", 0, &json!({"appId": "a"})).unwrap());
    assert!(!insert_if_absent(&conn, "a", 3, &json!({"appId": "a", "late": true})).unwrap());

    let rows = query_by_depth_and_status(&conn, 0, FrontierStatus::Unvisited).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "a");
    assert_eq!(rows[0].depth, 0);
    assert_eq!(rows[0].snapshot, json!({"appId": "a"}));
    assert!(query_by_depth_and_status(&conn, 3, FrontierStatus::Unvisited).unwrap().is_empty());
    assert_eq!(frontier_count(&conn).unwrap(), 1);
}

#[test]
fn test_seed_page_counts_only_new_rows() {
    let conn = open_db_in_memory().unwrap();
    insert_if_absent(&conn, "b", 2, &json!({})).unwrap();
    let page = vec![
        CatalogItem::new("a", json!({"appId": "a"})),
        CatalogItem::new("b", json!({"appId": "b"})),
        CatalogItem::new("a", json!({"appId": "a"})),
        CatalogItem::new("c", json!({"appId": "c"})),
    ];
    assert_eq!(insert_seed_page(&conn, &page).unwrap(), 2);
    assert_eq!(frontier_count(&conn).unwrap(), 3);

    // "b" was first seen at depth 2 and stays there
    let depth0 = query_by_depth_and_status(&conn, 0, FrontierStatus::Unvisited).unwrap();
    let ids: Vec<&str> = depth0.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn test_mark_status_is_terminal() {
    let conn = open_db_in_memory().unwrap();
    insert_if_absent(&conn, "a", 0, &json!({})).unwrap();
    insert_if_absent(&conn, "b", 0, &json!({})).unwrap();

    assert!(mark_status(&conn, "a", FrontierStatus::Visited).unwrap());
    assert!(mark_status(&conn, "b", FrontierStatus::Error).unwrap());
    // no transition out of a terminal status
    assert!(!mark_status(&conn, "a", FrontierStatus::Error).unwrap());
    assert!(!mark_status(&conn, "b", FrontierStatus::Visited).unwrap());
    assert!(!mark_status(&conn, "missing", FrontierStatus::Visited).unwrap());

    assert_eq!(
        query_by_depth_and_status(&conn, 0, FrontierStatus::Visited).unwrap()[0].id,
        "a"
    );
    assert_eq!(
        query_by_depth_and_status(&conn, 0, FrontierStatus::Error).unwrap()[0].id,
        "b"
    );
    assert!(query_by_depth_and_status(&conn, 0, FrontierStatus::Unvisited).unwrap().is_empty());
}

#[test]
fn test_status_codes() {
    assert_eq!(FrontierStatus::Unvisited.code(), 0);
    assert_eq!(FrontierStatus::Visited.code(), 1);
    assert_eq!(FrontierStatus::Error.code(), -2);
    assert_eq!(FrontierStatus::from_code(-2), Some(FrontierStatus::Error));
    assert_eq!(FrontierStatus::from_code(7), None);
}

#[test]
fn test_row_exists() {
    let conn = open_db_in_memory().unwrap();
    assert!(!row_exists(&conn, "a").unwrap());
    insert_if_absent(&conn, "a", 1, &json!({})).unwrap();
    assert!(row_exists(&conn, "a").unwrap());
}

#[test]
fn test_ids_missing_info() {
    let conn = open_db_in_memory().unwrap();
    for id in ["x", "y", "z"] {
        insert_if_absent(&conn, id, 0, &json!({})).unwrap();
    }
    insert_info(&conn, &info("x", 10, true)).unwrap();
    assert_eq!(ids_missing_info(&conn).unwrap(), vec!["y", "z"]);

    insert_info(&conn, &info("y", 10, true)).unwrap();
    insert_info(&conn, &info("z", 10, true)).unwrap();
    assert!(ids_missing_info(&conn).unwrap().is_empty());
}

#[test]
fn test_insert_info_duplicate() {
    let conn = open_db_in_memory().unwrap();
    insert_info(&conn, &info("a", 100, true)).unwrap();
    let err = insert_info(&conn, &info("a", 999, false)).unwrap_err();
    assert!(err.is_duplicate());
    assert!(matches!(err, StoreError::Duplicate { ref id, .. } if id == "a"));

    // first row untouched
    assert_eq!(info_count(&conn).unwrap(), 1);
    let rows = query_info_by_filter(
        &conn,
        ExportFilter {
            only_free: true,
            min_installs: 0,
        },
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].min_installs, 100);
    assert_eq!(rows[0].detail, json!({"appId": "a"}));
}

#[test]
fn test_query_info_by_filter() {
    let conn = open_db_in_memory().unwrap();
    insert_info(&conn, &info("a", 500, true)).unwrap();
    insert_info(&conn, &info("b", 50, true)).unwrap();
    insert_info(&conn, &info("c", 5000, false)).unwrap();

    let free: Vec<String> = query_info_by_filter(
        &conn,
        ExportFilter {
            only_free: true,
            min_installs: 100,
        },
    )
    .unwrap()
    .into_iter()
    .map(|r| r.id)
    .collect();
    assert_eq!(free, vec!["a"]);

    let paid: Vec<String> = query_info_by_filter(
        &conn,
        ExportFilter {
            only_free: false,
            min_installs: 0,
        },
    )
    .unwrap()
    .into_iter()
    .map(|r| r.id)
    .collect();
    assert_eq!(paid, vec!["c"]);

    // bound is inclusive
    let exact = query_info_by_filter(
        &conn,
        ExportFilter {
            only_free: true,
            min_installs: 500,
        },
    )
    .unwrap();
    assert_eq!(exact.len(), 1);
}

#[test]
fn test_frontier_summary() {
    let conn = open_db_in_memory().unwrap();
    for id in ["a", "b", "c"] {
        insert_if_absent(&conn, id, 0, &json!({})).unwrap();
    }
    insert_if_absent(&conn, "d", 1, &json!({})).unwrap();
    mark_status(&conn, "a", FrontierStatus::Visited).unwrap();
    mark_status(&conn, "b", FrontierStatus::Error).unwrap();

    let summary = frontier_summary(&conn).unwrap();
    assert_eq!(
        summary,
        vec![
            DepthCount {
                depth: 0,
                status: FrontierStatus::Visited,
                count: 1
            },
            DepthCount {
                depth: 0,
                status: FrontierStatus::Unvisited,
                count: 1
            },
            DepthCount {
                depth: 0,
                status: FrontierStatus::Error,
                count: 1
            },
            DepthCount {
                depth: 1,
                status: FrontierStatus::Unvisited,
                count: 1
            },
        ]
    );
}

#[test]
fn test_open_db_file_persists() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("apps.db");
    {
        let conn = open_db(&db_path).unwrap();
        insert_if_absent(&conn, "a", 0, &json!({"appId": "a"})).unwrap();
        insert_info(&conn, &info("a", 1, true)).unwrap();
    }
    let conn = open_db(&db_path).unwrap();
    assert_eq!(frontier_count(&conn).unwrap(), 1);
    assert_eq!(info_count(&conn).unwrap(), 1);
    assert!(ids_missing_info(&conn).unwrap().is_empty());
}
