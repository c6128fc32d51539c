//! PCD (Point Cloud Data) I/O.
//!
//! ASCII subset of the PCL format: `FIELDS x y z` with optional
//! `normal_x normal_y normal_z`, `DATA ascii` only.

use std::io::{BufRead, Write};

use nalgebra::{Point3, Vector3};

use crate::{Error, Result};
use pct_core::PointSet;

/// Read an ASCII PCD point set from a reader.
pub fn read_pcd<R: BufRead>(reader: R) -> Result<PointSet> {
    let mut lines = reader.lines();

    let mut fields: Vec<String> = Vec::new();
    let mut points_count = 0usize;
    let mut width = 0usize;
    let mut height = 1usize;
    let mut in_header = true;

    while in_header {
        let line = lines
            .next()
            .ok_or_else(|| Error::Parse("Unexpected EOF in header".to_string()))??;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "FIELDS" => {
                fields = parts[1..].iter().map(|s| s.to_string()).collect();
            }
            "WIDTH" => {
                width = parts
                    .get(1)
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| Error::Parse("Invalid WIDTH".to_string()))?;
            }
            "HEIGHT" => {
                height = parts
                    .get(1)
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| Error::Parse("Invalid HEIGHT".to_string()))?;
            }
            "POINTS" => {
                points_count = parts
                    .get(1)
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| Error::Parse("Invalid POINTS".to_string()))?;
            }
            "DATA" => {
                let kind = parts.get(1).copied().unwrap_or("");
                if kind != "ascii" {
                    return Err(Error::UnsupportedFormat(format!(
                        "PCD data format '{}' not supported, only ascii",
                        kind
                    )));
                }
                in_header = false;
            }
            // VERSION, SIZE, TYPE, COUNT, VIEWPOINT
            _ => {}
        }
    }

    if points_count == 0 {
        points_count = width * height;
    }

    let field_index = |name: &str| fields.iter().position(|f| f == name);
    let (ix, iy, iz) = match (field_index("x"), field_index("y"), field_index("z")) {
        (Some(ix), Some(iy), Some(iz)) => (ix, iy, iz),
        _ => {
            return Err(Error::InvalidData(
                "PCD header lacks x/y/z fields".to_string(),
            ))
        }
    };
    let normal_fields = (
        field_index("normal_x"),
        field_index("normal_y"),
        field_index("normal_z"),
    );

    let mut positions: Vec<Point3<f64>> = Vec::with_capacity(points_count);
    let mut normals: Vec<Vector3<f64>> = Vec::new();

    for _ in 0..points_count {
        let line = lines
            .next()
            .ok_or_else(|| Error::Parse("Unexpected EOF in data".to_string()))??;
        let values: Vec<f64> = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse()
                    .map_err(|_| Error::Parse(format!("Invalid number: {}", token)))
            })
            .collect::<Result<Vec<_>>>()?;

        if values.len() < fields.len() {
            return Err(Error::InvalidData(
                "Not enough values for point".to_string(),
            ));
        }

        positions.push(Point3::new(values[ix], values[iy], values[iz]));
        if let (Some(nx), Some(ny), Some(nz)) = normal_fields {
            normals.push(Vector3::new(values[nx], values[ny], values[nz]));
        }
    }

    let points = PointSet::from_points(positions);
    if normals.is_empty() {
        Ok(points)
    } else {
        points.with_normals(normals)
    }
}

/// Write the active points as ASCII PCD.
pub fn write_pcd<W: Write>(writer: &mut W, points: &PointSet) -> Result<()> {
    let n = points.len();
    let fields = if points.has_normals() {
        "x y z normal_x normal_y normal_z"
    } else {
        "x y z"
    };
    let field_count = fields.split_whitespace().count();

    writeln!(writer, "# .PCD v0.7 - Point Cloud Data file format")?;
    writeln!(writer, "VERSION 0.7")?;
    writeln!(writer, "FIELDS {}", fields)?;
    writeln!(writer, "SIZE {}", vec!["8"; field_count].join(" "))?;
    writeln!(writer, "TYPE {}", vec!["F"; field_count].join(" "))?;
    writeln!(writer, "COUNT {}", vec!["1"; field_count].join(" "))?;
    writeln!(writer, "WIDTH {}", n)?;
    writeln!(writer, "HEIGHT 1")?;
    writeln!(writer, "VIEWPOINT 0 0 0 1 0 0 0")?;
    writeln!(writer, "POINTS {}", n)?;
    writeln!(writer, "DATA ascii")?;

    for id in points.iter() {
        let p = points.point(id);
        write!(writer, "{} {} {}", p.x, p.y, p.z)?;
        if let Some(normals) = points.normals() {
            let nrm = normals[id.index()];
            write!(writer, " {} {} {}", nrm.x, nrm.y, nrm.z)?;
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
    fn round_trip() {
        let points = PointSet::from_points(vec![
            Point3::new(0.0, 1.0, 2.0),
            Point3::new(3.0, 4.0, 5.0),
        ])
        .with_normals(vec![Vector3::z(), Vector3::x()])
        .unwrap();

        let mut buffer = Vec::new();
        write_pcd(&mut buffer, &points).unwrap();
        let loaded = read_pcd(Cursor::new(buffer)).unwrap();

        assert_eq!(loaded.len(), 2);
        assert!(loaded.has_normals());
    }

    #[test]
    fn binary_pcd_is_rejected() {
        let data = "VERSION 0.7\nFIELDS x y z\nWIDTH 1\nHEIGHT 1\nPOINTS 1\nDATA binary\n";
        let err = read_pcd(Cursor::new(data)).unwrap_err();
        assert!(err.to_string().contains("only ascii"));
    }

    #[test]
    fn missing_xyz_fields_is_an_error() {
        let data = "VERSION 0.7\nFIELDS intensity\nWIDTH 1\nHEIGHT 1\nPOINTS 1\nDATA ascii\n1.0\n";
        assert!(read_pcd(Cursor::new(data)).is_err());
    }
}
