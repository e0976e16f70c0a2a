//! Area-wide statistics and cost for a completed scan.

use rust_decimal::Decimal;

use crate::types::{ScanPointResult, ScanStats};

/// Reduces per-point results into [`ScanStats`].
///
/// `total_points` is always `grid_size²`, independent of how many results
/// succeeded. Only arrival-order-independent reductions are used.
#[must_use]
pub fn compute_stats(results: &[ScanPointResult], grid_size: usize) -> ScanStats {
    let total_points = grid_size * grid_size;
    let ranks: Vec<u32> = results.iter().filter_map(|r| r.rank).collect();
    let ranked_points = ranks.len();
    let failed_points = results.iter().filter(|r| r.failed).count();

    #[allow(clippy::cast_precision_loss)]
    let average_rank = if ranks.is_empty() {
        None
    } else {
        let sum: u64 = ranks.iter().map(|&r| u64::from(r)).sum();
        let mean = sum as f64 / ranked_points as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let visibility_percent = if total_points == 0 {
        0
    } else {
        (100.0 * ranked_points as f64 / total_points as f64).round() as u32
    };

    ScanStats {
        total_points,
        ranked_points,
        failed_points,
        average_rank,
        visibility_percent,
        top3_count: ranks.iter().filter(|&&r| r <= 3).count(),
        top10_count: ranks.iter().filter(|&&r| r <= 10).count(),
    }
}

/// Provider spend for a scan: every point is billed once it is attempted.
#[must_use]
pub fn scan_cost(total_points: usize, unit_cost: Decimal) -> Decimal {
    Decimal::from(total_points) * unit_cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::generate_grid;

    fn results_with_ranks(ranks: &[Option<u32>]) -> Vec<ScanPointResult> {
        let n = (ranks.len() as f64).sqrt() as usize;
        generate_grid(40.0, -75.0, n, 2.0)
            .into_iter()
            .zip(ranks)
            .map(|(point, rank)| ScanPointResult {
                point,
                rank: *rank,
                top_result: None,
                business_found: None,
                failed: false,
            })
            .collect()
    }

    #[test]
    fn no_ranked_points_gives_null_average() {
        let results = results_with_ranks(&[None; 9]);
        let stats = compute_stats(&results, 3);
        assert_eq!(stats.total_points, 9);
        assert_eq!(stats.ranked_points, 0);
        assert_eq!(stats.average_rank, None);
        assert_eq!(stats.visibility_percent, 0);
        assert_eq!(stats.top3_count, 0);
        assert_eq!(stats.top10_count, 0);
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        // mean of 1, 2, 2 = 1.666.. -> 1.7
        let mut ranks = vec![Some(1), Some(2), Some(2)];
        ranks.extend([None; 6]);
        let stats = compute_stats(&results_with_ranks(&ranks), 3);
        assert_eq!(stats.average_rank, Some(1.7));
        assert_eq!(stats.ranked_points, 3);
        // 3 of 9 = 33.3% -> 33
        assert_eq!(stats.visibility_percent, 33);
    }

    #[test]
    fn top_buckets_are_nested() {
        let ranks = [
            Some(1),
            Some(3),
            Some(4),
            Some(10),
            Some(11),
            Some(20),
            None,
            None,
            Some(2),
        ];
        let stats = compute_stats(&results_with_ranks(&ranks), 3);
        assert_eq!(stats.top3_count, 3);
        assert_eq!(stats.top10_count, 5);
        assert!(stats.top3_count <= stats.top10_count);
        assert!(stats.top10_count <= stats.total_points);
    }

    #[test]
    fn full_visibility_is_one_hundred_percent() {
        let stats = compute_stats(&results_with_ranks(&[Some(1); 4]), 2);
        assert_eq!(stats.visibility_percent, 100);
        assert_eq!(stats.average_rank, Some(1.0));
    }

    #[test]
    fn failed_points_are_counted_separately() {
        let mut results = results_with_ranks(&[Some(1), None, None, None]);
        results[1] = ScanPointResult::failed(results[1].point);
        let stats = compute_stats(&results, 2);
        assert_eq!(stats.failed_points, 1);
        assert_eq!(stats.ranked_points, 1);
        assert_eq!(stats.total_points, 4);
    }

    #[test]
    fn cost_is_points_times_unit_cost() {
        let unit = Decimal::new(2, 3);
        assert_eq!(scan_cost(25, unit), Decimal::new(50, 3));
        assert_eq!(scan_cost(0, unit), Decimal::ZERO);
    }
}
