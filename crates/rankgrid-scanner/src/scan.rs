//! Grid scan orchestration.
//!
//! A fixed pool of tokio workers shares one atomic cursor over the generated
//! points. Each worker claims the next index, queries the provider, matches
//! the target, and sleeps the pacing delay before claiming again. Workers
//! hand back `(index, result)` pairs that are slotted into a pre-sized array
//! after the join, so output order is the grid order regardless of which
//! worker finished first.
//!
//! A failed query becomes an unranked point; only precondition failures abort
//! a scan.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rankgrid_core::AppConfig;
use rust_decimal::Decimal;
use tokio::task::JoinSet;

use crate::aggregate::{compute_stats, scan_cost};
use crate::error::ScanError;
use crate::grid::{generate_grid, GridPoint};
use crate::matcher::{match_business, MatchTarget};
use crate::provider::{BusinessLookup, RankProvider, DEFAULT_DEPTH};
use crate::resolve::{resolve_center, ScanCenter};
use crate::types::{ScanPointResult, ScanSummary};

const MIN_GRID_SIZE: usize = 2;
const MAX_GRID_SIZE: usize = 25;
const MAX_DEPTH: u32 = 100;

/// Tunables for a single scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    pub grid_size: usize,
    pub radius_miles: f64,
    /// Pause each worker takes after every point.
    pub delay_ms: u64,
    /// Worker count; `0` is treated as `1`.
    pub concurrency: usize,
    /// Results requested per point.
    pub depth: u32,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            grid_size: 5,
            radius_miles: 5.0,
            delay_ms: 100,
            concurrency: 3,
            depth: DEFAULT_DEPTH,
        }
    }
}

impl ScanOptions {
    /// Default grid shape with pacing, concurrency, and depth from config.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            delay_ms: config.scan_delay_ms,
            concurrency: config.scan_concurrency,
            depth: config.scan_depth,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ScanError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ScanError::InvalidOptions(format!(
                "grid size {} is outside {MIN_GRID_SIZE}..={MAX_GRID_SIZE}",
                self.grid_size
            )));
        }
        if !self.radius_miles.is_finite() || self.radius_miles <= 0.0 {
            return Err(ScanError::InvalidOptions(format!(
                "radius {} must be a positive number of miles",
                self.radius_miles
            )));
        }
        if !(1..=MAX_DEPTH).contains(&self.depth) {
            return Err(ScanError::InvalidOptions(format!(
                "depth {} is outside 1..={MAX_DEPTH}",
                self.depth
            )));
        }
        Ok(())
    }
}

/// Everything needed to run one scan.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub keyword: String,
    pub center: ScanCenter,
    /// Name to match; defaults to the listing title the business lookup
    /// resolved for a [`ScanCenter::Business`] center.
    pub business_name: Option<String>,
    /// Place id to match; defaults to the id found by the business lookup.
    pub place_id: Option<String>,
    pub options: ScanOptions,
    /// Provider price per point query.
    pub unit_cost: Decimal,
}

/// Resolves the center, scans every grid point, and summarizes the results.
///
/// # Errors
///
/// Returns [`ScanError`] only for precondition failures: invalid options, a
/// blank keyword, an unresolvable center, or nothing to match against. Point
/// query failures are recorded in the summary instead.
pub async fn run_scan<P, L>(
    provider: Arc<P>,
    lookup: &L,
    request: ScanRequest,
) -> Result<ScanSummary, ScanError>
where
    P: RankProvider + ?Sized + 'static,
    L: BusinessLookup + ?Sized,
{
    let ScanRequest {
        keyword,
        center,
        business_name,
        place_id,
        options,
        unit_cost,
    } = request;

    let keyword = keyword.trim().to_owned();
    if keyword.is_empty() {
        return Err(ScanError::InvalidOptions("keyword must not be empty".to_owned()));
    }
    options.validate()?;

    let resolved = resolve_center(&center, lookup).await?;

    let target = MatchTarget::new(
        place_id.or(resolved.place_id),
        business_name.or(resolved.display_name),
    );
    if target.is_empty() {
        return Err(ScanError::InvalidOptions(
            "a business name or place id is required to rank".to_owned(),
        ));
    }

    tracing::info!(
        keyword = %keyword,
        grid_size = options.grid_size,
        radius_miles = options.radius_miles,
        center_lat = resolved.lat,
        center_lng = resolved.lng,
        concurrency = options.concurrency,
        "starting grid scan"
    );

    let points = generate_grid(
        resolved.lat,
        resolved.lng,
        options.grid_size,
        options.radius_miles,
    );
    let results = scan_points(provider, &keyword, &target, points, &options).await;

    let stats = compute_stats(&results, options.grid_size);
    let cost = scan_cost(stats.total_points, unit_cost);

    tracing::info!(
        keyword = %keyword,
        total_points = stats.total_points,
        ranked_points = stats.ranked_points,
        failed_points = stats.failed_points,
        visibility_percent = stats.visibility_percent,
        %cost,
        "grid scan finished"
    );

    Ok(ScanSummary {
        keyword,
        business_name: target.business_name,
        place_id: target.place_id,
        grid_size: options.grid_size,
        radius_miles: options.radius_miles,
        center_lat: resolved.lat,
        center_lng: resolved.lng,
        results,
        stats,
        cost,
        scanned_at: Utc::now(),
    })
}

/// Runs the worker pool over `points` and returns one result per point, in
/// point order.
async fn scan_points<P>(
    provider: Arc<P>,
    keyword: &str,
    target: &MatchTarget,
    points: Vec<GridPoint>,
    options: &ScanOptions,
) -> Vec<ScanPointResult>
where
    P: RankProvider + ?Sized + 'static,
{
    let points = Arc::new(points);
    let cursor = Arc::new(AtomicUsize::new(0));
    let keyword: Arc<str> = Arc::from(keyword);
    let target = Arc::new(target.clone());
    let delay = Duration::from_millis(options.delay_ms);
    let depth = options.depth;
    let worker_count = options.concurrency.max(1).min(points.len());

    let mut workers = JoinSet::new();
    for worker in 0..worker_count {
        let provider = Arc::clone(&provider);
        let points = Arc::clone(&points);
        let cursor = Arc::clone(&cursor);
        let keyword = Arc::clone(&keyword);
        let target = Arc::clone(&target);

        workers.spawn(async move {
            let mut finished = Vec::new();
            loop {
                let idx = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(point) = points.get(idx).copied() else {
                    break;
                };
                let result = scan_point(provider.as_ref(), &keyword, point, depth, &target).await;
                finished.push((idx, result));
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            tracing::debug!(worker, processed = finished.len(), "scan worker done");
            finished
        });
    }

    let mut slots: Vec<Option<ScanPointResult>> = vec![None; points.len()];
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(finished) => {
                for (idx, result) in finished {
                    slots[idx] = Some(result);
                }
            }
            Err(e) => tracing::error!(error = %e, "scan worker aborted"),
        }
    }

    // Points claimed by an aborted worker have no result; record them as failed.
    slots
        .into_iter()
        .zip(points.iter())
        .map(|(slot, point)| slot.unwrap_or_else(|| ScanPointResult::failed(*point)))
        .collect()
}

async fn scan_point<P>(
    provider: &P,
    keyword: &str,
    point: GridPoint,
    depth: u32,
    target: &MatchTarget,
) -> ScanPointResult
where
    P: RankProvider + ?Sized,
{
    match provider.rank_items(keyword, point.lat, point.lng, depth).await {
        Ok(items) => {
            let found = match_business(&items, target);
            tracing::debug!(
                row = point.row,
                col = point.col,
                items = items.len(),
                rank = ?found.rank,
                "grid point ranked"
            );
            ScanPointResult {
                point,
                rank: found.rank,
                top_result: found.top_result,
                business_found: found.business_found,
                failed: false,
            }
        }
        Err(err) => {
            tracing::warn!(
                row = point.row,
                col = point.col,
                error = %err,
                "grid point query failed"
            );
            ScanPointResult::failed(point)
        }
    }
}

#[cfg(test)]
#[path = "scan_test.rs"]
mod tests;
