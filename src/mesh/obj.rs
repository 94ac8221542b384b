//! Wavefront OBJ import.
//!
//! Only geometry is read: `v`, `vn` and `f` records. Texture coordinates,
//! groups and materials are skipped.

use std::path::Path;

use super::arrow::{LIT, SHADED};
use super::{MeshData, VertexAttribute};
use crate::error::{FreecamError, Result};

/// What each vertex carries besides its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjShading {
    /// One float: darker when the vertex's first normal points straight down.
    Intensity,
    /// Three floats: the mean of every normal the vertex was referenced with.
    #[allow(dead_code)]
    AveragedNormals,
}

#[derive(Debug, Clone, Copy)]
struct Corner {
    vertex: usize,
    normal: Option<usize>,
}

pub fn load_obj(path: &Path, shading: ObjShading) -> Result<MeshData> {
    let source = std::fs::read_to_string(path)?;
    parse_obj(&source, shading).map_err(|e| match e {
        FreecamError::EmptyMesh(_) => FreecamError::EmptyMesh(path.display().to_string()),
        other => other,
    })
}

pub fn parse_obj(source: &str, shading: ObjShading) -> Result<MeshData> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut vertex_normals: Vec<Vec<[f32; 3]>> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for (n, line) in source.lines().enumerate() {
        let line_no = n + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => {
                positions.push(parse_vec3(fields, line_no)?);
                vertex_normals.push(Vec::new());
            }
            Some("vn") => normals.push(parse_vec3(fields, line_no)?),
            Some("f") => {
                let corners = fields
                    .map(|field| parse_corner(field, line_no, positions.len(), normals.len()))
                    .collect::<Result<Vec<_>>>()?;
                if corners.len() < 3 {
                    return Err(FreecamError::obj(line_no, "face needs at least 3 vertices"));
                }

                for corner in &corners {
                    if let Some(normal) = corner.normal {
                        vertex_normals[corner.vertex].push(normals[normal]);
                    }
                }

                // fan triangulation keeps triangles as-is
                for i in 1..corners.len() - 1 {
                    indices.push(corners[0].vertex as u32);
                    indices.push(corners[i].vertex as u32);
                    indices.push(corners[i + 1].vertex as u32);
                }
            }
            _ => {}
        }
    }

    if positions.is_empty() || indices.is_empty() {
        return Err(FreecamError::EmptyMesh("obj source".to_string()));
    }

    let has_normals = vertex_normals.iter().any(|n| !n.is_empty());
    let mut attributes = vec![VertexAttribute::new(0, 3)];
    if has_normals {
        attributes.push(match shading {
            ObjShading::Intensity => VertexAttribute::new(1, 1),
            ObjShading::AveragedNormals => VertexAttribute::new(1, 3),
        });
    }

    let mut vertices = Vec::new();
    for (position, normals) in positions.iter().zip(&vertex_normals) {
        vertices.extend_from_slice(position);
        if !has_normals {
            continue;
        }
        match shading {
            ObjShading::Intensity => vertices.push(intensity(normals.first())),
            ObjShading::AveragedNormals => vertices.extend_from_slice(&average(normals)),
        }
    }

    Ok(MeshData {
        vertices,
        indices: Some(indices),
        attributes,
    })
}

fn parse_vec3<'a>(mut fields: impl Iterator<Item = &'a str>, line_no: usize) -> Result<[f32; 3]> {
    let mut out = [0.0; 3];
    for slot in &mut out {
        let field = fields
            .next()
            .ok_or_else(|| FreecamError::obj(line_no, "expected 3 coordinates"))?;
        *slot = field
            .parse()
            .map_err(|_| FreecamError::obj(line_no, format!("bad coordinate '{field}'")))?;
    }
    Ok(out)
}

/// Parses `v`, `v/t`, `v//n` or `v/t/n` into zero-based indices.
fn parse_corner(field: &str, line_no: usize, vertices: usize, normals: usize) -> Result<Corner> {
    let mut parts = field.split('/');
    let vertex = parts.next().unwrap_or_default();
    let vertex = parse_index(vertex, line_no, vertices, "vertex")?;

    let _texture = parts.next();
    let normal = match parts.next() {
        Some(n) if !n.is_empty() => Some(parse_index(n, line_no, normals, "normal")?),
        _ => None,
    };

    Ok(Corner { vertex, normal })
}

fn parse_index(field: &str, line_no: usize, defined: usize, kind: &str) -> Result<usize> {
    let index: i64 = field
        .parse()
        .map_err(|_| FreecamError::obj(line_no, format!("bad {kind} index '{field}'")))?;
    if index < 1 {
        return Err(FreecamError::obj(
            line_no,
            format!("{kind} index {index} must be positive"),
        ));
    }
    if index as usize > defined {
        return Err(FreecamError::obj(
            line_no,
            format!("{kind} index {index} out of range ({defined} defined)"),
        ));
    }
    Ok(index as usize - 1)
}

fn intensity(normal: Option<&[f32; 3]>) -> f32 {
    let Some(&[x, y, z]) = normal else {
        return LIT;
    };
    let length = (x * x + y * y + z * z).sqrt();
    if length > 0.0 && (y / length + 1.0).abs() <= f32::EPSILON {
        SHADED
    } else {
        LIT
    }
}

fn average(normals: &[[f32; 3]]) -> [f32; 3] {
    if normals.is_empty() {
        return [0.0; 3];
    }
    let mut sum = [0.0; 3];
    for n in normals {
        sum[0] += n[0];
        sum[1] += n[1];
        sum[2] += n[2];
    }
    let count = normals.len() as f32;
    [sum[0] / count, sum[1] / count, sum[2] / count]
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# WaveFront *.obj file
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
vn 0 -1 0
f 1//2 2//1 3//1 4//1
";

    #[test]
    fn polygon_faces_are_fan_triangulated() {
        let mesh = parse_obj(QUAD, ObjShading::Intensity).unwrap();
        assert_eq!(mesh.indices, Some(vec![0, 1, 2, 0, 2, 3]));
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn intensity_darkens_vertices_whose_first_normal_points_down() {
        let mesh = parse_obj(QUAD, ObjShading::Intensity).unwrap();
        assert_eq!(mesh.stride(), 4);
        assert_eq!(mesh.vertex(0)[3], SHADED);
        assert_eq!(mesh.vertex(1)[3], LIT);
    }

    #[test]
    fn averaged_normals_take_the_mean_of_every_reference() {
        let source = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
vn 1 0 0
vn 0 1 0
f 1//1 2//1 3//1
f 1//2 3//2 4//2
";
        let mesh = parse_obj(source, ObjShading::AveragedNormals).unwrap();
        assert_eq!(mesh.stride(), 6);
        assert_eq!(&mesh.vertex(0)[3..6], &[0.5, 0.5, 0.0]);
        assert_eq!(&mesh.vertex(1)[3..6], &[1.0, 0.0, 0.0]);
        assert_eq!(&mesh.vertex(3)[3..6], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn all_three_face_forms_are_accepted() {
        let source = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1 2 3
f 1/1/1 2/1/1 3/1/1
f 1//1 2//1 3//1
";
        let mesh = parse_obj(source, ObjShading::Intensity).unwrap();
        assert_eq!(mesh.element_count(), 9);
    }

    #[test]
    fn files_without_normals_yield_positions_only() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = parse_obj(source, ObjShading::AveragedNormals).unwrap();
        assert_eq!(mesh.stride(), 3);
        assert_eq!(mesh.vertices.len(), 9);
    }

    #[test]
    fn out_of_range_index_reports_its_line() {
        let source = "v 0 0 0\nv 1 0 0\nf 1 2 3\n";
        let err = parse_obj(source, ObjShading::Intensity).unwrap_err();
        assert!(matches!(err, FreecamError::ObjParse { line: 3, .. }));
    }

    #[test]
    fn relative_and_zero_indices_are_rejected() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -1 -2 -3\n";
        assert!(parse_obj(source, ObjShading::Intensity).is_err());
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        assert!(parse_obj(source, ObjShading::Intensity).is_err());
    }

    #[test]
    fn malformed_coordinates_are_errors() {
        let err = parse_obj("v 0 zero 0\n", ObjShading::Intensity).unwrap_err();
        assert!(matches!(err, FreecamError::ObjParse { line: 1, .. }));
        let err = parse_obj("vn 0 1\n", ObjShading::Intensity).unwrap_err();
        assert!(matches!(err, FreecamError::ObjParse { line: 1, .. }));
    }

    #[test]
    fn geometry_without_faces_is_empty() {
        let err = parse_obj("v 0 0 0\n", ObjShading::Intensity).unwrap_err();
        assert!(matches!(err, FreecamError::EmptyMesh(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_obj(Path::new("does/not/exist.obj"), ObjShading::Intensity).unwrap_err();
        assert!(matches!(err, FreecamError::Io(_)));
    }
}
