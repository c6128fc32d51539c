//! Average spacing estimation.

use rayon::prelude::*;

use pct_core::{PointId, PointSet, RTreeIndex};

/// Mean over all points of the mean distance to their `k` nearest
/// neighbors. Returns 0.0 for an empty set or `k == 0`.
pub fn average_spacing(points: &PointSet, k: usize) -> f64 {
    if points.is_empty() || k == 0 {
        return 0.0;
    }

    let index = RTreeIndex::build(points);
    let ids: Vec<PointId> = points.iter().collect();

    let sum: f64 = ids
        .par_iter()
        .map(|&id| {
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
        .sum();

    sum / ids.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn regular_line_has_uniform_spacing() {
        let points = PointSet::from_points(
            (0..10).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect(),
        );
        let spacing = average_spacing(&points, 1);
        assert!((spacing - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_set_yields_zero() {
        let points = PointSet::new();
        assert_eq!(average_spacing(&points, 6), 0.0);
    }
}
