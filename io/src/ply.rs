//! PLY (Polygon File Format) I/O.
//!
//! ASCII only. The reader is driven by the vertex property declarations:
//! `x y z` are required, `nx ny nz` and `red green blue` are recognized,
//! and any other scalar integer property becomes a named integer map on
//! the point set. Float properties with unknown names are skipped. The
//! writer emits positions, normals, colors and every integer map, for the
//! active points only.

use std::io::{BufRead, Write};

use nalgebra::{Point3, Vector3};

use crate::{Error, Result};
use pct_core::{Color, PointSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropKind {
    Float,
    Int,
}

fn prop_kind(type_name: &str) -> Result<PropKind> {
    match type_name {
        "float" | "float32" | "double" | "float64" => Ok(PropKind::Float),
        "char" | "int8" | "uchar" | "uint8" | "short" | "int16" | "ushort" | "uint16" | "int"
        | "int32" | "uint" | "uint32" => Ok(PropKind::Int),
        other => Err(Error::UnsupportedFormat(format!(
            "PLY property type '{}'",
            other
        ))),
    }
}

#[derive(Debug, Clone)]
struct VertexProp {
    name: String,
    kind: PropKind,
}

/// Read an ASCII PLY point set from a reader.
pub fn read_ply<R: BufRead>(reader: R) -> Result<PointSet> {
    let mut lines = reader.lines();

    let magic = lines
        .next()
        .ok_or_else(|| Error::Parse("Empty PLY stream".to_string()))??;
    if magic.trim() != "ply" {
        return Err(Error::Parse("Missing 'ply' magic line".to_string()));
    }

    // Elements in declaration order; properties are tracked for the
    // vertex element only.
    let mut elements: Vec<(String, usize)> = Vec::new();
    let mut vertex_props: Vec<VertexProp> = Vec::new();
    let mut in_header = true;

    while in_header {
        let line = lines
            .next()
            .ok_or_else(|| Error::Parse("Unexpected EOF in header".to_string()))??;
        let line = line.trim();
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("format") => {
                let format = parts
                    .next()
                    .ok_or_else(|| Error::Parse("Invalid format line".to_string()))?;
                if format != "ascii" {
                    return Err(Error::UnsupportedFormat(format!(
                        "PLY format '{}' not supported, only ASCII",
                        format
                    )));
                }
            }
            Some("element") => {
                let name = parts
                    .next()
                    .ok_or_else(|| Error::Parse("Invalid element line".to_string()))?;
                let count: usize = parts
                    .next()
                    .ok_or_else(|| Error::Parse("Invalid element count".to_string()))?
                    .parse()
                    .map_err(|_| Error::Parse("Invalid element count number".to_string()))?;
                elements.push((name.to_string(), count));
            }
            Some("property") => {
                let in_vertex = matches!(elements.last(), Some((name, _)) if name == "vertex");
                if !in_vertex {
                    continue;
                }
                let type_name = parts
                    .next()
                    .ok_or_else(|| Error::Parse("Invalid property line".to_string()))?;
                if type_name == "list" {
                    return Err(Error::UnsupportedFormat(
                        "list property on vertex element".to_string(),
                    ));
                }
                let name = parts
                    .next()
                    .ok_or_else(|| Error::Parse("Invalid property line".to_string()))?;
                vertex_props.push(VertexProp {
                    name: name.to_string(),
                    kind: prop_kind(type_name)?,
                });
            }
            Some("comment") | Some("obj_info") => {}
            Some("end_header") => in_header = false,
            _ => {}
        }
    }

    for coord in ["x", "y", "z"] {
        if !vertex_props.iter().any(|p| p.name == coord) {
            return Err(Error::InvalidData(format!(
                "PLY vertex element lacks property '{}'",
                coord
            )));
        }
    }
    let has_normals = ["nx", "ny", "nz"]
        .iter()
        .all(|n| vertex_props.iter().any(|p| p.name == *n));
    let has_colors = ["red", "green", "blue"]
        .iter()
        .all(|c| vertex_props.iter().any(|p| p.name == *c));

    let reserved = |name: &str| {
        matches!(
            name,
            "x" | "y" | "z" | "nx" | "ny" | "nz" | "red" | "green" | "blue"
        )
    };
    let mut int_maps: Vec<(String, Vec<i32>)> = vertex_props
        .iter()
        .filter(|p| p.kind == PropKind::Int && !reserved(&p.name))
        .map(|p| (p.name.clone(), Vec::new()))
        .collect();

    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut normals: Vec<Vector3<f64>> = Vec::new();
    let mut colors: Vec<Color> = Vec::new();

    for (element, count) in &elements {
        if element != "vertex" {
            // Skip the data rows of non-vertex elements.
            for _ in 0..*count {
                lines
                    .next()
                    .ok_or_else(|| Error::Parse("Unexpected EOF in data".to_string()))??;
            }
            continue;
        }

        positions.reserve(*count);
        for _ in 0..*count {
            let line = lines
                .next()
                .ok_or_else(|| Error::Parse("Unexpected EOF in data".to_string()))??;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < vertex_props.len() {
                return Err(Error::InvalidData(
                    "Not enough values for vertex".to_string(),
                ));
            }

            let mut pos = [0.0f64; 3];
            let mut normal = [0.0f64; 3];
            let mut color = [0u8; 3];

            for (prop, token) in vertex_props.iter().zip(&tokens) {
                let value: f64 = token
                    .parse()
                    .map_err(|_| Error::Parse(format!("Invalid number: {}", token)))?;
                match prop.name.as_str() {
                    "x" => pos[0] = value,
                    "y" => pos[1] = value,
                    "z" => pos[2] = value,
                    "nx" => normal[0] = value,
                    "ny" => normal[1] = value,
                    "nz" => normal[2] = value,
                    "red" | "green" | "blue" => {
                        let channel = match prop.name.as_str() {
                            "red" => 0,
                            "green" => 1,
                            _ => 2,
                        };
                        // Float-typed colors are normalized to 0..1.
                        color[channel] = match prop.kind {
                            PropKind::Int => value.clamp(0.0, 255.0) as u8,
                            PropKind::Float => (value * 255.0).clamp(0.0, 255.0) as u8,
                        };
                    }
                    name => {
                        if prop.kind == PropKind::Int {
                            if let Some((_, values)) =
                                int_maps.iter_mut().find(|(n, _)| n.as_str() == name)
                            {
                                values.push(value as i32);
                            }
                        }
                    }
                }
            }

            positions.push(Point3::new(pos[0], pos[1], pos[2]));
            if has_normals {
                normals.push(Vector3::new(normal[0], normal[1], normal[2]));
            }
            if has_colors {
                colors.push(color);
            }
        }
    }

    let mut points = PointSet::from_points(positions);
    if has_normals {
        points = points.with_normals(normals)?;
    }
    if has_colors {
        points = points.with_colors(colors)?;
    }
    for (name, values) in int_maps {
        points.insert_int_map(&name, values)?;
    }
    Ok(points)
}

/// Write the active points as ASCII PLY.
pub fn write_ply<W: Write>(writer: &mut W, points: &PointSet) -> Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", points.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;

    if points.has_normals() {
        writeln!(writer, "property double nx")?;
        writeln!(writer, "property double ny")?;
        writeln!(writer, "property double nz")?;
    }
    if points.has_colors() {
        writeln!(writer, "property uchar red")?;
        writeln!(writer, "property uchar green")?;
        writeln!(writer, "property uchar blue")?;
    }
    let map_names: Vec<&str> = points.int_map_names().collect();
    for name in &map_names {
        writeln!(writer, "property int {}", name)?;
    }
    writeln!(writer, "end_header")?;

    for id in points.iter() {
        let p = points.point(id);
        write!(writer, "{} {} {}", p.x, p.y, p.z)?;

        if let Some(normals) = points.normals() {
            let n = normals[id.index()];
            write!(writer, " {} {} {}", n.x, n.y, n.z)?;
        }
        if let Some(colors) = points.colors() {
            let c = colors[id.index()];
            write!(writer, " {} {} {}", c[0], c[1], c[2])?;
        }
        for &name in &map_names {
            // Names were just listed, so the lookup cannot miss.
            if let Some(values) = points.int_map(name) {
                write!(writer, " {}", values[id.index()])?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}
