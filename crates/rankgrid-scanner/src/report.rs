//! Plain-text rendering of a scan as a rank matrix.

use std::fmt::Write as _;

use crate::types::{ScanPointResult, ScanSummary};

/// Renders the summary as a `grid_size` x `grid_size` matrix, north at the
/// top, followed by one stats line.
///
/// Cells show the organic rank, `--` when the business was not found, and
/// `!!` when the point's query failed.
#[must_use]
pub fn render_rank_grid(summary: &ScanSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\"{}\" around ({:.5}, {:.5}), {}x{} grid, {} mi radius",
        summary.keyword,
        summary.center_lat,
        summary.center_lng,
        summary.grid_size,
        summary.grid_size,
        summary.radius_miles
    );

    for row in summary.results.chunks(summary.grid_size.max(1)) {
        let cells: Vec<String> = row.iter().map(cell).collect();
        let _ = writeln!(out, "{}", cells.join(" "));
    }

    let stats = &summary.stats;
    let average = stats
        .average_rank
        .map_or_else(|| "n/a".to_owned(), |avg| format!("{avg:.1}"));
    let _ = write!(
        out,
        "visible {}% ({}/{}) | avg rank {} | top3 {} | top10 {} | failed {} | cost {}",
        stats.visibility_percent,
        stats.ranked_points,
        stats.total_points,
        average,
        stats.top3_count,
        stats.top10_count,
        stats.failed_points,
        summary.cost
    );
    out
}

fn cell(result: &ScanPointResult) -> String {
    match result.rank {
        Some(rank) => format!("{rank:>2}"),
        None if result.failed => "!!".to_owned(),
        None => "--".to_owned(),
    }
}
