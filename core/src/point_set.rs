//! Indexed point-set container.
//!
//! A [`PointSet`] stores 3D points with stable identifiers and optional
//! per-point attributes (normals, colors, named integer maps). The logical
//! view is an indirection array split into an active prefix and a retired
//! tail: operations that drop points rewrite the prefix and grow the tail
//! instead of erasing storage, so callers can report how many points were
//! removed before compacting.

use std::collections::BTreeMap;

use nalgebra::{Point3, Vector3};

use crate::{Error, Result};

/// Stable handle to one point of a [`PointSet`].
///
/// Identifiers are assigned 0..N-1 at construction and stay valid until
/// [`PointSet::collect_garbage`] compacts the storage. The ordering carries
/// no geometric meaning; it exists so identifiers can live in sorted
/// containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(u32);

impl PointId {
    /// Position of this point in the raw attribute storage.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// RGB color attribute, one byte per channel.
pub type Color = [u8; 3];

#[derive(Debug, Clone, Default)]
pub struct PointSet {
    positions: Vec<Point3<f64>>,
    normals: Option<Vec<Vector3<f64>>>,
    colors: Option<Vec<Color>>,
    int_maps: BTreeMap<String, Vec<i32>>,
    /// Permutation of 0..positions.len(): active prefix, then retired tail.
    order: Vec<PointId>,
    /// Length of the retired tail.
    removed: usize,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(positions: Vec<Point3<f64>>) -> Self {
        let order = (0..positions.len() as u32).map(PointId).collect();
        Self {
            positions,
            normals: None,
            colors: None,
            int_maps: BTreeMap::new(),
            order,
            removed: 0,
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vector3<f64>>) -> Result<Self> {
        if normals.len() == self.positions.len() {
            self.normals = Some(normals);
            Ok(self)
        } else {
            Err(Error::InvalidInput(format!(
                "Normal count {} does not match point count {}",
                normals.len(),
                self.positions.len()
            )))
        }
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Result<Self> {
        if colors.len() == self.positions.len() {
            self.colors = Some(colors);
            Ok(self)
        } else {
            Err(Error::InvalidInput(format!(
                "Color count {} does not match point count {}",
                colors.len(),
                self.positions.len()
            )))
        }
    }

    /// Number of active points.
    pub fn len(&self) -> usize {
        self.order.len() - self.removed
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of retired points still physically present.
    pub fn garbage_len(&self) -> usize {
        self.removed
    }

    /// Number of storage slots, active and retired.
    pub fn total_len(&self) -> usize {
        self.positions.len()
    }

    /// Iterate over the active points in their current logical order.
    pub fn iter(&self) -> impl Iterator<Item = PointId> + '_ {
        self.order[..self.order.len() - self.removed].iter().copied()
    }

    #[inline]
    pub fn point(&self, id: PointId) -> &Point3<f64> {
        &self.positions[id.index()]
    }

    #[inline]
    pub fn set_point(&mut self, id: PointId, p: Point3<f64>) {
        self.positions[id.index()] = p;
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn normals(&self) -> Option<&[Vector3<f64>]> {
        self.normals.as_deref()
    }

    /// Normal storage for every slot, created zero-filled on first use.
    pub fn ensure_normals(&mut self) -> &mut [Vector3<f64>] {
        let n = self.positions.len();
        self.normals.get_or_insert_with(|| vec![Vector3::zeros(); n])
    }

    /// Detach the normal storage, leaving the set without normals.
    pub fn take_normals(&mut self) -> Option<Vec<Vector3<f64>>> {
        self.normals.take()
    }

    /// Re-attach normal storage previously obtained from [`take_normals`].
    ///
    /// [`take_normals`]: PointSet::take_normals
    pub fn restore_normals(&mut self, normals: Vec<Vector3<f64>>) {
        debug_assert_eq!(normals.len(), self.positions.len());
        self.normals = Some(normals);
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    pub fn colors(&self) -> Option<&[Color]> {
        self.colors.as_deref()
    }

    /// Named per-point integer attribute map, created on first use with
    /// `default` in every slot. Returns the raw storage, indexed by
    /// [`PointId::index`].
    pub fn add_int_map(&mut self, name: &str, default: i32) -> &mut [i32] {
        let n = self.positions.len();
        self.int_maps
            .entry(name.to_string())
            .or_insert_with(|| vec![default; n])
    }

    pub fn int_map(&self, name: &str) -> Option<&[i32]> {
        self.int_maps.get(name).map(Vec::as_slice)
    }

    /// Install a fully populated integer map read from a file.
    pub fn insert_int_map(&mut self, name: &str, values: Vec<i32>) -> Result<()> {
        if values.len() != self.positions.len() {
            return Err(Error::InvalidInput(format!(
                "Attribute '{}' count {} does not match point count {}",
                name,
                values.len(),
                self.positions.len()
            )));
        }
        self.int_maps.insert(name.to_string(), values);
        Ok(())
    }

    /// Names of the integer attribute maps, in a stable order.
    pub fn int_map_names(&self) -> impl Iterator<Item = &str> {
        self.int_maps.keys().map(String::as_str)
    }

    /// Overwrite the first `prefix.len()` logical slots with `prefix` and
    /// retire every other active point.
    ///
    /// `prefix` must be a duplicate-free subset of the current active range.
    /// Retired points keep their storage and their relative order until
    /// [`collect_garbage`] runs, so they stay countable and recoverable.
    ///
    /// [`collect_garbage`]: PointSet::collect_garbage
    pub fn reorder_and_truncate(&mut self, prefix: &[PointId]) {
        let active = self.order.len() - self.removed;
        debug_assert!(prefix.len() <= active);

        let mut kept = vec![false; self.positions.len()];
        for &id in prefix {
            debug_assert!(!kept[id.index()], "duplicate id in prefix");
            kept[id.index()] = true;
        }

        let mut new_order = Vec::with_capacity(self.order.len());
        new_order.extend_from_slice(prefix);
        new_order.extend(self.order[..active].iter().filter(|id| !kept[id.index()]));
        new_order.extend_from_slice(&self.order[active..]);
        debug_assert_eq!(new_order.len(), self.order.len());

        self.removed += active - prefix.len();
        self.order = new_order;
    }

    /// Physically drop retired points and renumber the survivors.
    ///
    /// Identifiers handed out before compaction are invalidated.
    pub fn collect_garbage(&mut self) {
        if self.removed == 0 {
            return;
        }
        let active = self.order.len() - self.removed;
        let survivors: Vec<PointId> = self.order[..active].to_vec();

        let positions = std::mem::take(&mut self.positions);
        self.positions = survivors.iter().map(|id| positions[id.index()]).collect();
        if let Some(normals) = self.normals.take() {
            self.normals = Some(survivors.iter().map(|id| normals[id.index()]).collect());
        }
        if let Some(colors) = self.colors.take() {
            self.colors = Some(survivors.iter().map(|id| colors[id.index()]).collect());
        }
        for values in self.int_maps.values_mut() {
            let old = std::mem::take(values);
            *values = survivors.iter().map(|id| old[id.index()]).collect();
        }

        self.order = (0..active as u32).map(PointId).collect();
        self.removed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PointSet {
        PointSet::from_points(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        ])
    }

    #[test]
    fn attribute_count_mismatch_is_rejected() {
        let points = sample();
        let bad = points.clone().with_normals(vec![Vector3::z()]);
        assert!(bad.is_err());
        assert!(bad.unwrap_err().to_string().contains("Normal count"));

        let bad = points.with_colors(vec![[255, 0, 0]]);
        assert!(bad.is_err());
    }

    #[test]
    fn reorder_and_truncate_retires_the_rest() {
        let mut points = sample();
        let ids: Vec<PointId> = points.iter().collect();

        points.reorder_and_truncate(&[ids[2], ids[0]]);

        assert_eq!(points.len(), 2);
        assert_eq!(points.garbage_len(), 2);
        assert_eq!(points.total_len(), 4);
        let active: Vec<PointId> = points.iter().collect();
        assert_eq!(active, vec![ids[2], ids[0]]);
        // Retired points are still physically readable.
        assert_eq!(points.point(ids[3]).x, 3.0);
    }

    #[test]
    fn truncate_to_zero_is_valid() {
        let mut points = sample();
        points.reorder_and_truncate(&[]);
        assert!(points.is_empty());
        assert_eq!(points.garbage_len(), 4);
    }

    #[test]
    fn int_map_defaults_and_updates() {
        let mut points = sample();
        let ids: Vec<PointId> = points.iter().collect();

        let map = points.add_int_map("label", -1);
        assert!(map.iter().all(|&v| v == -1));
        map[ids[1].index()] = 7;

        assert_eq!(points.int_map("label").unwrap()[ids[1].index()], 7);
        assert_eq!(points.int_map_names().collect::<Vec<_>>(), vec!["label"]);
    }

    #[test]
    fn collect_garbage_compacts_storage() {
        let mut points = sample();
        let ids: Vec<PointId> = points.iter().collect();
        points.add_int_map("label", -1)[ids[3].index()] = 5;

        points.reorder_and_truncate(&[ids[3], ids[1]]);
        points.collect_garbage();

        assert_eq!(points.len(), 2);
        assert_eq!(points.garbage_len(), 0);
        assert_eq!(points.total_len(), 2);
        let active: Vec<f64> = points.iter().map(|id| points.point(id).x).collect();
        assert_eq!(active, vec![3.0, 1.0]);
        assert_eq!(points.int_map("label").unwrap(), &[5, -1]);
    }
}
