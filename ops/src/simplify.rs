//! Point-set simplification.

use std::collections::HashSet;

use rand::seq::SliceRandom;

use pct_core::{PointId, PointSet};

/// Retire all but one point per occupied cell of a regular grid with cell
/// size `epsilon`. The first point of a cell in iteration order survives;
/// survivors keep their relative order. Returns the number retired.
pub fn grid_simplify(points: &mut PointSet, epsilon: f64) -> usize {
    if points.is_empty() || epsilon <= 0.0 {
        return 0;
    }

    let mut occupied: HashSet<(i64, i64, i64)> = HashSet::new();
    let mut keep: Vec<PointId> = Vec::new();
    for id in points.iter() {
        let p = points.point(id);
        let cell = (
            (p.x / epsilon).floor() as i64,
            (p.y / epsilon).floor() as i64,
            (p.z / epsilon).floor() as i64,
        );
        if occupied.insert(cell) {
            keep.push(id);
        }
    }

    let removed = points.len() - keep.len();
    points.reorder_and_truncate(&keep);
    removed
}

/// Retire `percent`% of the points, chosen uniformly at random. Survivors
/// keep their relative order. Returns the number retired.
pub fn random_simplify(points: &mut PointSet, percent: f64) -> usize {
    let n = points.len();
    let to_remove = (n as f64 * percent.clamp(0.0, 100.0) / 100.0).floor() as usize;
    if to_remove == 0 {
        return 0;
    }

    let mut ids: Vec<PointId> = points.iter().collect();
    ids.shuffle(&mut rand::thread_rng());
    let dropped: HashSet<PointId> = ids[..to_remove].iter().copied().collect();

    let keep: Vec<PointId> = points.iter().filter(|id| !dropped.contains(id)).collect();
    points.reorder_and_truncate(&keep);
    to_remove
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn grid_keeps_one_point_per_cell() {
        // 10x10 points spanning 0.0..0.09 in x and y.
        let mut pts = Vec::new();
        for i in 0..10 {
            for j in 0..10 {
                pts.push(Point3::new(i as f64 * 0.01, j as f64 * 0.01, 0.0));
            }
        }
        let mut points = PointSet::from_points(pts);

        // One cell covers everything.
        let removed = grid_simplify(&mut points, 0.2);
        assert_eq!(removed, 99);
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn grid_cell_size_controls_survivor_count() {
        let mut pts = Vec::new();
        for i in 0..10 {
            for j in 0..10 {
                pts.push(Point3::new(i as f64 * 0.01, j as f64 * 0.01, 0.0));
            }
        }
        let mut points = PointSet::from_points(pts);

        // Cells of 0.05 split 0.00..0.09 into two bins per axis.
        grid_simplify(&mut points, 0.05);
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn grid_survivor_is_an_input_point() {
        let mut points = PointSet::from_points(vec![
            Point3::new(0.01, 0.0, 0.0),
            Point3::new(0.02, 0.0, 0.0),
        ]);
        grid_simplify(&mut points, 1.0);

        assert_eq!(points.len(), 1);
        let id = points.iter().next().unwrap();
        assert_eq!(points.point(id).x, 0.01);
    }

    #[test]
    fn random_simplify_removes_the_requested_fraction() {
        let mut points = PointSet::from_points(
            (0..100).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect(),
        );
        let removed = random_simplify(&mut points, 25.0);

        assert_eq!(removed, 25);
        assert_eq!(points.len(), 75);
        assert_eq!(points.garbage_len(), 25);

        // Survivors keep their relative order.
        let xs: Vec<f64> = points.iter().map(|id| points.point(id).x).collect();
        let mut sorted = xs.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(xs, sorted);
    }

    #[test]
    fn random_simplify_zero_percent_is_a_no_op() {
        let mut points = PointSet::from_points(vec![Point3::new(0.0, 0.0, 0.0)]);
        assert_eq!(random_simplify(&mut points, 0.0), 0);
        assert_eq!(points.len(), 1);
    }
}
