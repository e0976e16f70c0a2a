//! Result schema for grid scans.
//!
//! Everything here is built fresh per scan and never mutated afterwards. The
//! serialized form (camelCase keys) is the contract report consumers read.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::grid::GridPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Organic,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub value: f64,
    pub count: u64,
}

/// One entry of a provider result list for a single grid point.
///
/// Lists are kept in provider order (best first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankItem {
    pub kind: ItemKind,
    pub rank_absolute: u32,
    pub place_id: String,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<Rating>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanPointResult {
    pub point: GridPoint,
    /// 1-based organic rank; `None` when not found or when the query failed.
    pub rank: Option<u32>,
    pub top_result: Option<String>,
    pub business_found: Option<String>,
    /// `true` when the provider query for this point errored.
    #[serde(default)]
    pub failed: bool,
}

impl ScanPointResult {
    /// Placeholder recorded for a point whose query did not succeed.
    #[must_use]
    pub fn failed(point: GridPoint) -> Self {
        Self {
            point,
            rank: None,
            top_result: None,
            business_found: None,
            failed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub total_points: usize,
    pub ranked_points: usize,
    pub failed_points: usize,
    /// Mean of non-null ranks to one decimal place.
    pub average_rank: Option<f64>,
    pub visibility_percent: u32,
    pub top3_count: usize,
    pub top10_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub keyword: String,
    pub business_name: Option<String>,
    pub place_id: Option<String>,
    pub grid_size: usize,
    pub radius_miles: f64,
    pub center_lat: f64,
    pub center_lng: f64,
    /// Indexed by `row * grid_size + col`.
    pub results: Vec<ScanPointResult>,
    pub stats: ScanStats,
    /// Amount attempted to spend: charged per point, failed or not.
    pub cost: Decimal,
    pub scanned_at: DateTime<Utc>,
}
