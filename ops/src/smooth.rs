//! Projection smoothing.

use nalgebra::Point3;
use rayon::prelude::*;

use pct_core::{PointId, PointSet, RTreeIndex};

use crate::normals::pca_plane;

/// Smooth the cloud by projecting each point onto the least-variance
/// plane of its `k`-nearest neighborhood, `iterations` times. The index
/// is rebuilt between iterations so later passes see the moved points.
pub fn smooth_point_set(points: &mut PointSet, k: usize, iterations: usize) {
    if points.len() < 3 || k < 3 {
        return;
    }

    for _ in 0..iterations {
        let index = RTreeIndex::build(points);
        let ids: Vec<PointId> = points.iter().collect();

        let moved: Vec<(PointId, Point3<f64>)> = ids
            .par_iter()
            .map(|&id| {
                let p = *points.point(id);
                let neighborhood: Vec<Point3<f64>> = index
                    .nearest(&p, k)
                    .into_iter()
                    .map(|(nb, _)| *points.point(nb))
                    .collect();
                match pca_plane(&neighborhood) {
                    Some((centroid, normal)) => {
                        let offset = (p - centroid).dot(&normal);
                        (id, p - normal * offset)
                    }
                    None => (id, p),
                }
            })
            .collect();

        for (id, p) in moved {
            points.set_point(id, p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noisy_plane_flattens() {
        // Plane z = 0 with alternating +/- z noise.
        let mut pts = Vec::new();
        for i in 0..10 {
            for j in 0..10 {
                let noise = if (i + j) % 2 == 0 { 0.05 } else { -0.05 };
                pts.push(Point3::new(i as f64 * 0.1, j as f64 * 0.1, noise));
            }
        }
        let mut points = PointSet::from_points(pts);

        let before: f64 = points.iter().map(|id| points.point(id).z.abs()).sum();
        smooth_point_set(&mut points, 9, 2);
        let after: f64 = points.iter().map(|id| points.point(id).z.abs()).sum();

        assert!(after < before * 0.5, "before {before}, after {after}");
        assert_eq!(points.len(), 100);
    }

    #[test]
    fn tiny_cloud_is_left_alone() {
        let mut points = PointSet::from_points(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ]);
        smooth_point_set(&mut points, 12, 1);
        assert_eq!(points.point(points.iter().next().unwrap()).x, 0.0);
    }
}
