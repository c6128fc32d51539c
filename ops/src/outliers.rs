//! Outlier removal.

use rayon::prelude::*;

use pct_core::{PointId, PointSet, RTreeIndex, RangeQuery};

/// Retire points whose mean distance to their `k` nearest neighbors is
/// large.
///
/// Points are ranked by that mean distance; at most `percent`% of them
/// (the worst-ranked) are retired, and only those whose mean distance
/// exceeds `distance`. Survivors keep their relative order. Returns the
/// number of points retired.
pub fn remove_statistical_outliers(
    points: &mut PointSet,
    k: usize,
    percent: f64,
    distance: f64,
) -> usize {
    if points.is_empty() || k == 0 {
        return 0;
    }

    let index = RTreeIndex::build(points);
    let ids: Vec<PointId> = points.iter().collect();

    let scores: Vec<f64> = ids
        .par_iter()
        .map(|&id| {
            // k + 1 nearest: the query point itself comes back at distance 0.
            let neighbors = index.nearest(points.point(id), k + 1);
            let mut sum = 0.0;
            let mut count = 0usize;
            for &(_, d) in neighbors.iter().skip(1) {
                sum += d;
                count += 1;
            }
            if count > 0 {
                sum / count as f64
            } else {
                0.0
            }
        })
        .collect();

    let limit = (ids.len() as f64 * percent.clamp(0.0, 100.0) / 100.0).floor() as usize;
    let mut ranked: Vec<usize> = (0..ids.len()).collect();
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut drop = vec![false; ids.len()];
    for &r in ranked.iter().take(limit) {
        if scores[r] > distance {
            drop[r] = true;
        }
    }

    let keep: Vec<PointId> = ids
        .iter()
        .enumerate()
        .filter(|&(i, _)| !drop[i])
        .map(|(_, &id)| id)
        .collect();
    let removed = ids.len() - keep.len();
    points.reorder_and_truncate(&keep);
    removed
}

/// Retire points with fewer than `min_neighbors` neighbors within
/// `radius` (the point itself counts). Returns the number retired.
pub fn remove_radius_outliers(points: &mut PointSet, radius: f64, min_neighbors: usize) -> usize {
    if points.is_empty() {
        return 0;
    }

    let index = RTreeIndex::build(points);
    let ids: Vec<PointId> = points.iter().collect();

    let keep_mask: Vec<bool> = ids
        .par_iter()
        .map(|&id| {
            let mut found = Vec::new();
            index.points_within(points.point(id), radius, &mut found);
            found.len() >= min_neighbors
        })
        .collect();

    let keep: Vec<PointId> = ids
        .iter()
        .zip(&keep_mask)
        .filter(|&(_, &k)| k)
        .map(|(&id, _)| id)
        .collect();
    let removed = ids.len() - keep.len();
    points.reorder_and_truncate(&keep);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn cluster_with_outlier() -> PointSet {
        let mut pts: Vec<Point3<f64>> = (0..10)
            .map(|i| Point3::new(i as f64 * 0.01, 0.0, 0.0))
            .collect();
        pts.push(Point3::new(10.0, 10.0, 10.0));
        PointSet::from_points(pts)
    }

    #[test]
    fn statistical_removal_drops_the_outlier() {
        let mut points = cluster_with_outlier();
        let removed = remove_statistical_outliers(&mut points, 5, 10.0, 0.5);

        assert_eq!(removed, 1);
        assert_eq!(points.len(), 10);
        assert_eq!(points.garbage_len(), 1);
        assert!(points.iter().all(|id| points.point(id).x < 1.0));
    }

    #[test]
    fn distance_threshold_caps_percent_removal() {
        let mut points = cluster_with_outlier();
        // 50% may be removed, but only the far point exceeds the distance cap.
        let removed = remove_statistical_outliers(&mut points, 5, 50.0, 0.5);
        assert_eq!(removed, 1);
    }

    #[test]
    fn radius_removal_drops_isolated_points() {
        let mut points = cluster_with_outlier();
        let removed = remove_radius_outliers(&mut points, 0.5, 5);

        assert_eq!(removed, 1);
        assert_eq!(points.len(), 10);
    }

    #[test]
    fn survivors_keep_their_order() {
        let mut points = cluster_with_outlier();
        remove_statistical_outliers(&mut points, 5, 10.0, 0.5);

        let xs: Vec<f64> = points.iter().map(|id| points.point(id).x).collect();
        let mut sorted = xs.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(xs, sorted);
    }
}
