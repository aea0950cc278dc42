//! Store status: frontier counts per depth and status, plus backfill progress

use anyhow::Result;
use rusqlite::Connection;

use crate::engine::db_ops::{frontier_count, frontier_summary, info_count, missing_info_count};
use crate::utils::Colors;
use crate::{DepthCount, FrontierStatus};

/// Snapshot of what the store holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub levels: Vec<DepthCount>,
    pub frontier: usize,
    /// All info rows, including ones whose id is not in the frontier.
    pub with_info: usize,
    /// Frontier rows still waiting for metadata.
    pub missing_info: usize,
}

impl StatusReport {
    /// Rows with the given status across all depths.
    pub fn total(&self, status: FrontierStatus) -> usize {
        self.levels
            .iter()
            .filter(|l| l.status == status)
            .map(|l| l.count)
            .sum()
    }
}

pub fn frontier_report(conn: &Connection) -> Result<StatusReport> {
    Ok(StatusReport {
        levels: frontier_summary(conn)?,
        frontier: frontier_count(conn)?,
        with_info: info_count(conn)?,
        missing_info: missing_info_count(conn)?,
    })
}

fn status_label(status: FrontierStatus) -> String {
    match status {
        FrontierStatus::Unvisited => Colors::colorize(Colors::UNVISITED, "unvisited"),
        FrontierStatus::Visited => Colors::colorize(Colors::VISITED, "visited"),
        FrontierStatus::Error => Colors::colorize(Colors::ERROR, "error"),
    }
}

/// Print report to stdout
pub fn print_report(report: &StatusReport) {
    if report.frontier == 0 {
        println!("Store is empty.");
        return;
    }

    for level in &report.levels {
        println!(
            "depth {:>2}  {:<20} {}",
            level.depth,
            status_label(level.status),
            level.count
        );
    }

    // Summary
    println!(
        "{} | {} | {}",
        Colors::colorize(
            Colors::UNVISITED,
            &format!("Unvisited: {}", report.total(FrontierStatus::Unvisited))
        ),
        Colors::colorize(
            Colors::VISITED,
            &format!("Visited: {}", report.total(FrontierStatus::Visited))
        ),
        Colors::colorize(
            Colors::ERROR,
            &format!("Error: {}", report.total(FrontierStatus::Error))
        )
    );
    println!(
        "{} apps, {} with info, {} missing info",
        report.frontier,
        report.with_info,
        report.missing_info
    );
}
