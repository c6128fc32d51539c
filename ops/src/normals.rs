//! Normal estimation and orientation.

use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};
use rayon::prelude::*;

use pct_core::{PointId, PointSet, RTreeIndex};

/// Centroid and unit normal of the least-variance plane through a
/// neighborhood. Returns `None` for degenerate neighborhoods.
pub(crate) fn pca_plane(neighborhood: &[Point3<f64>]) -> Option<(Point3<f64>, Vector3<f64>)> {
    if neighborhood.len() < 3 {
        return None;
    }

    let mut centroid = Vector3::zeros();
    for p in neighborhood {
        centroid += p.coords;
    }
    centroid /= neighborhood.len() as f64;

    let mut cov = Matrix3::zeros();
    for p in neighborhood {
        let d = p.coords - centroid;
        cov += d * d.transpose();
    }
    cov /= neighborhood.len() as f64;

    let eigen = SymmetricEigen::new(cov);
    let mut min_val = f64::MAX;
    let mut min_idx = 0;
    for i in 0..3 {
        if eigen.eigenvalues[i] < min_val {
            min_val = eigen.eigenvalues[i];
            min_idx = i;
        }
    }

    let normal = eigen.eigenvectors.column(min_idx).into_owned();
    if normal.norm_squared() < 1e-12 {
        return None;
    }
    Some((Point3::from(centroid), normal))
}

/// Estimate a normal per point from the PCA of its `k` nearest neighbors.
///
/// The normal is the eigenvector of the neighborhood covariance with the
/// smallest eigenvalue. Orientation is arbitrary; run [`orient_normals`]
/// afterwards for a consistent field.
pub fn estimate_normals(points: &mut PointSet, k: usize) {
    if points.is_empty() || k == 0 {
        return;
    }

    let index = RTreeIndex::build(points);
    let ids: Vec<PointId> = points.iter().collect();

    let computed: Vec<(PointId, Vector3<f64>)> = ids
        .par_iter()
        .map(|&id| {
            let neighborhood: Vec<Point3<f64>> = index
                .nearest(points.point(id), k)
                .into_iter()
                .map(|(nb, _)| *points.point(nb))
                .collect();
            let normal = match pca_plane(&neighborhood) {
                Some((_, n)) => n,
                None => Vector3::z(),
            };
            (id, normal)
        })
        .collect();

    let normals = points.ensure_normals();
    for (id, n) in computed {
        normals[id.index()] = n;
    }
}

/// Orient an existing normal field consistently.
///
/// Propagates the sign of the first point's normal over the
/// `k`-nearest-neighbor graph, flipping neighbors that disagree. Points
/// left unreached (disconnected components) are flipped by majority vote
/// over their own neighborhood.
pub fn orient_normals(points: &mut PointSet, k: usize) {
    if points.len() < 3 || k == 0 {
        return;
    }
    let mut normals = match points.take_normals() {
        Some(n) => n,
        None => return,
    };

    let index = RTreeIndex::build(points);
    let ids: Vec<PointId> = points.iter().collect();

    let mut visited = vec![false; points.total_len()];
    let mut stack = vec![ids[0]];
    visited[ids[0].index()] = true;

    while let Some(current) = stack.pop() {
        for (nb, _) in index.nearest(points.point(current), k) {
            if visited[nb.index()] {
                continue;
            }
            if normals[nb.index()].dot(&normals[current.index()]) < 0.0 {
                normals[nb.index()] = -normals[nb.index()];
            }
            visited[nb.index()] = true;
            stack.push(nb);
        }
    }

    for &id in &ids {
        if visited[id.index()] {
            continue;
        }
        let neighbors = index.nearest(points.point(id), k);
        let flips = neighbors
            .iter()
            .filter(|(nb, _)| normals[id.index()].dot(&normals[nb.index()]) < 0.0)
            .count();
        if flips > neighbors.len() / 2 {
            normals[id.index()] = -normals[id.index()];
        }
    }

    points.restore_normals(normals);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane_cloud() -> PointSet {
        let mut pts = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                pts.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        PointSet::from_points(pts)
    }

    #[test]
    fn normals_of_a_plane_are_vertical() {
        let mut points = plane_cloud();
        estimate_normals(&mut points, 5);

        let normals = points.normals().unwrap();
        for id in points.iter() {
            let n = normals[id.index()];
            assert!(n.z.abs() > 0.9, "normal {:?} is not vertical", n);
        }
    }

    #[test]
    fn orientation_makes_signs_agree() {
        let mut points = plane_cloud();
        estimate_normals(&mut points, 5);

        // Scramble signs, then orient.
        {
            let normals = points.ensure_normals();
            for (i, n) in normals.iter_mut().enumerate() {
                if i % 2 == 0 {
                    *n = -*n;
                }
            }
        }
        orient_normals(&mut points, 6);

        let normals = points.normals().unwrap();
        let reference = normals[0];
        for id in points.iter() {
            assert!(normals[id.index()].dot(&reference) > 0.0);
        }
    }

    #[test]
    fn orient_without_normals_is_a_no_op() {
        let mut points = plane_cloud();
        orient_normals(&mut points, 6);
        assert!(!points.has_normals());
    }
}
