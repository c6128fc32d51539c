use nalgebra::{Point3, Vector3};
use pct_core::{PointId, PointSet};

#[test]
fn test_point_set_result_handling() {
    let points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)];
    let cloud = PointSet::from_points(points);

    // 1. Valid normals
    let normals = vec![Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 1.0)];
    let with_normals = cloud.clone().with_normals(normals);
    assert!(with_normals.is_ok());

    // 2. Invalid normals (count mismatch)
    let bad_normals = vec![Vector3::new(0.0, 0.0, 1.0)];
    let bad = cloud.clone().with_normals(bad_normals);
    assert!(bad.is_err());
    assert!(bad.unwrap_err().to_string().contains("Normal count"));

    // 3. Valid colors
    let colors = vec![[255, 0, 0], [0, 255, 0]];
    let with_colors = cloud.clone().with_colors(colors);
    assert!(with_colors.is_ok());

    // 4. Invalid colors (count mismatch)
    let bad = cloud.with_colors(vec![[255, 0, 0]]);
    assert!(bad.is_err());
    assert!(bad.unwrap_err().to_string().contains("Color count"));
}

#[test]
fn test_removal_accounting_survives_chained_truncations() {
    let mut points = PointSet::from_points(
        (0..10).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect(),
    );
    let ids: Vec<PointId> = points.iter().collect();

    points.reorder_and_truncate(&ids[..6]);
    assert_eq!((points.len(), points.garbage_len()), (6, 4));

    // A second truncation only sees the surviving prefix.
    let active: Vec<PointId> = points.iter().collect();
    points.reorder_and_truncate(&active[..2]);
    assert_eq!((points.len(), points.garbage_len()), (2, 8));
    assert_eq!(points.total_len(), 10);

    points.collect_garbage();
    assert_eq!((points.len(), points.garbage_len()), (2, 0));
    assert_eq!(points.total_len(), 2);
}

#[test]
fn test_attribute_maps_follow_compaction() {
    let mut points = PointSet::from_points(
        (0..4).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect(),
    );
    let ids: Vec<PointId> = points.iter().collect();

    let map = points.add_int_map("label", -1);
    map[ids[0].index()] = 0;
    map[ids[2].index()] = 1;

    points.reorder_and_truncate(&[ids[2], ids[0]]);
    points.collect_garbage();

    assert_eq!(points.int_map("label").unwrap(), &[1, 0]);
}
