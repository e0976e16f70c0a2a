//! Square sampling lattice around a scan center.
//!
//! Uses a flat-earth local approximation: one mile is `1/69` degree of
//! latitude everywhere, and `1/(69 * cos(lat))` degree of longitude evaluated
//! at the center latitude only.

use serde::{Deserialize, Serialize};

const MILES_PER_LAT_DEGREE: f64 = 69.0;

/// One sampled coordinate. `row` 0 is the northernmost row, `col` 0 the
/// westernmost column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub lat: f64,
    pub lng: f64,
    pub row: usize,
    pub col: usize,
}

/// Generate a `grid_size` x `grid_size` lattice spanning `2 * radius_miles`
/// on each axis, centered on `(center_lat, center_lng)`.
///
/// Points are returned row-major, so the point at `(row, col)` sits at index
/// `row * grid_size + col`. For odd sizes the middle point is the center.
/// A size of 1 yields just the center; 0 yields nothing.
#[must_use]
pub fn generate_grid(
    center_lat: f64,
    center_lng: f64,
    grid_size: usize,
    radius_miles: f64,
) -> Vec<GridPoint> {
    if grid_size == 0 {
        return Vec::new();
    }
    if grid_size == 1 {
        return vec![GridPoint {
            lat: center_lat,
            lng: center_lng,
            row: 0,
            col: 0,
        }];
    }

    let lat_deg_per_mile = 1.0 / MILES_PER_LAT_DEGREE;
    let lng_deg_per_mile = 1.0 / (MILES_PER_LAT_DEGREE * center_lat.to_radians().cos());

    let lat_span = 2.0 * radius_miles * lat_deg_per_mile;
    let lng_span = 2.0 * radius_miles * lng_deg_per_mile;

    #[allow(clippy::cast_precision_loss)]
    let steps = (grid_size - 1) as f64;
    let lat_step = lat_span / steps;
    let lng_step = lng_span / steps;

    let north = center_lat + lat_span / 2.0;
    let west = center_lng - lng_span / 2.0;

    let mut points = Vec::with_capacity(grid_size * grid_size);
    for row in 0..grid_size {
        #[allow(clippy::cast_precision_loss)]
        let lat = north - row as f64 * lat_step;
        for col in 0..grid_size {
            #[allow(clippy::cast_precision_loss)]
            let lng = west + col as f64 * lng_step;
            points.push(GridPoint { lat, lng, row, col });
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const SEATTLE: (f64, f64) = (47.606_2, -122.332_1);

    #[test]
    fn grid_has_n_squared_unique_cells() {
        for n in 2..=9 {
            let pts = generate_grid(SEATTLE.0, SEATTLE.1, n, 3.0);
            assert_eq!(pts.len(), n * n);
            let cells: HashSet<(usize, usize)> = pts.iter().map(|p| (p.row, p.col)).collect();
            assert_eq!(cells.len(), n * n);
            assert!(pts.iter().all(|p| p.row < n && p.col < n));
        }
    }

    #[test]
    fn points_are_row_major() {
        let pts = generate_grid(SEATTLE.0, SEATTLE.1, 4, 2.0);
        for (idx, p) in pts.iter().enumerate() {
            assert_eq!(idx, p.row * 4 + p.col);
        }
    }

    #[test]
    fn odd_grid_middle_point_is_center() {
        for n in [3, 5, 7, 9] {
            let pts = generate_grid(SEATTLE.0, SEATTLE.1, n, 5.0);
            let mid = (n - 1) / 2;
            let p = pts[mid * n + mid];
            assert!((p.lat - SEATTLE.0).abs() < 1e-9, "lat off for n={n}: {}", p.lat);
            assert!((p.lng - SEATTLE.1).abs() < 1e-9, "lng off for n={n}: {}", p.lng);
        }
    }

    #[test]
    fn adjacent_rows_are_evenly_spaced() {
        let pts = generate_grid(SEATTLE.0, SEATTLE.1, 5, 5.0);
        let expected = (2.0 * 5.0 / 69.0) / 4.0;
        for row in 1..5 {
            let diff = pts[(row - 1) * 5].lat - pts[row * 5].lat;
            assert!((diff - expected).abs() < 1e-4, "row {row}: {diff}");
        }
        assert!((expected - 0.0362).abs() < 1e-4);
    }

    #[test]
    fn row_zero_is_north_and_col_zero_is_west() {
        let pts = generate_grid(SEATTLE.0, SEATTLE.1, 3, 1.0);
        assert!(pts[0].lat > pts[6].lat);
        assert!(pts[0].lng < pts[2].lng);
    }

    #[test]
    fn longitude_span_widens_with_latitude() {
        let span = |lat: f64| {
            let pts = generate_grid(lat, 0.0, 3, 10.0);
            pts[2].lng - pts[0].lng
        };
        assert!(span(60.0) > span(10.0));
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_grid(SEATTLE.0, SEATTLE.1, 7, 12.5);
        let b = generate_grid(SEATTLE.0, SEATTLE.1, 7, 12.5);
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_sizes() {
        assert!(generate_grid(SEATTLE.0, SEATTLE.1, 0, 5.0).is_empty());
        let single = generate_grid(SEATTLE.0, SEATTLE.1, 1, 5.0);
        assert_eq!(single.len(), 1);
        assert!((single[0].lat - SEATTLE.0).abs() < f64::EPSILON);
    }
}
