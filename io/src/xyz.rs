//! XYZ I/O.
//!
//! Plain text, one point per line: `x y z`, optionally followed by
//! `nx ny nz`. The first data line decides whether normals are present.

use std::io::{BufRead, Write};

use nalgebra::{Point3, Vector3};

use crate::{Error, Result};
use pct_core::PointSet;

/// Read an XYZ point set from a reader.
pub fn read_xyz<R: BufRead>(reader: R) -> Result<PointSet> {
    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut normals: Vec<Vector3<f64>> = Vec::new();
    let mut has_normals = None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let values: Vec<f64> = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse()
                    .map_err(|_| Error::Parse(format!("Invalid number: {}", token)))
            })
            .collect::<Result<Vec<_>>>()?;

        let with_normals = *has_normals.get_or_insert(values.len() >= 6);
        let expected = if with_normals { 6 } else { 3 };
        if values.len() < expected {
            return Err(Error::InvalidData(format!(
                "Expected {} values per line, found {}",
                expected,
                values.len()
            )));
        }

        positions.push(Point3::new(values[0], values[1], values[2]));
        if with_normals {
            normals.push(Vector3::new(values[3], values[4], values[5]));
        }
    }

    let points = PointSet::from_points(positions);
    if has_normals == Some(true) {
        points.with_normals(normals)
    } else {
        Ok(points)
    }
}

/// Write the active points as XYZ.
pub fn write_xyz<W: Write>(writer: &mut W, points: &PointSet) -> Result<()> {
    for id in points.iter() {
        let p = points.point(id);
        write!(writer, "{} {} {}", p.x, p.y, p.z)?;
        if let Some(normals) = points.normals() {
            let n = normals[id.index()];
            write!(writer, " {} {} {}", n.x, n.y, n.z)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trip_with_normals() {
        let points = PointSet::from_points(vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(4.0, 5.0, 6.0),
        ])
        .with_normals(vec![Vector3::z(), Vector3::y()])
        .unwrap();

        let mut buffer = Vec::new();
        write_xyz(&mut buffer, &points).unwrap();
        let loaded = read_xyz(Cursor::new(buffer)).unwrap();

        assert_eq!(loaded.len(), 2);
        assert!(loaded.has_normals());
        let first = loaded.iter().next().unwrap();
        assert_eq!(loaded.normals().unwrap()[first.index()], Vector3::z());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let data = "# header\n\n0 0 0\n1 1 1\n";
        let loaded = read_xyz(Cursor::new(data)).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(!loaded.has_normals());
    }

    #[test]
    fn short_line_is_an_error() {
        let data = "0 0 0\n1 1\n";
        assert!(read_xyz(Cursor::new(data)).is_err());
    }
}
