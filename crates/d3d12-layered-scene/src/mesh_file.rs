use std::path::Path;

use eyre::eyre;
use eyre::Result;
use eyre::WrapErr;

use crate::geometry::MeshData;
use crate::geometry::PositionNormalUv;

/// Parses the whitespace-delimited text mesh format:
///
/// ```text
/// VertexCount: <n>
/// TriangleCount: <n>
/// VertexList (pos, normal) {
/// <px py pz nx ny nz> x n
/// }
/// TriangleList {
/// <a b c> x n
/// }
/// ```
///
/// Labels and braces are skipped by position, not matched; UVs are zeroed.
pub fn load_mesh_text(path: &Path) -> Result<MeshData> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading mesh file {}", path.display()))?;
    parse_mesh_text(&text).wrap_err_with(|| format!("parsing mesh file {}", path.display()))
}

pub fn parse_mesh_text(text: &str) -> Result<MeshData> {
    let mut tokens = text.split_whitespace();

    skip(&mut tokens, 1); // vertex count label
    let vertex_count: usize = next_value(&mut tokens, "vertex count")?;
    skip(&mut tokens, 1); // triangle count label
    let triangle_count: usize = next_value(&mut tokens, "triangle count")?;
    skip(&mut tokens, 4); // vertex list header

    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let position = [
            next_value(&mut tokens, "vertex position")?,
            next_value(&mut tokens, "vertex position")?,
            next_value(&mut tokens, "vertex position")?,
        ];
        let normal = [
            next_value(&mut tokens, "vertex normal")?,
            next_value(&mut tokens, "vertex normal")?,
            next_value(&mut tokens, "vertex normal")?,
        ];
        vertices.push(PositionNormalUv {
            position,
            normal,
            uv: [0.0, 0.0],
        });
    }

    skip(&mut tokens, 3); // triangle list header

    let mut indices = Vec::with_capacity(3 * triangle_count);
    for _ in 0..triangle_count {
        for _ in 0..3 {
            let index: u32 = next_value(&mut tokens, "triangle index")?;
            if index as usize >= vertex_count {
                return Err(eyre!("index {index} out of range for {vertex_count} vertices"));
            }
            indices.push(index);
        }
    }

    Ok(MeshData { vertices, indices })
}

fn skip<'a>(tokens: &mut impl Iterator<Item = &'a str>, count: usize) {
    for _ in 0..count {
        tokens.next();
    }
}

fn next_value<'a, T: std::str::FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<T> {
    let token = tokens.next().ok_or_else(|| eyre!("unexpected end of file reading {what}"))?;
    token
        .parse()
        .map_err(|_| eyre!("malformed {what}: {token:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
VertexCount: 3
TriangleCount: 1
VertexList (pos, normal) {
0.0 0.0 0.0 0.0 1.0 0.0
1.0 0.0 0.0 0.0 1.0 0.0
0.0 0.0 1.0 0.0 1.0 0.0
}
TriangleList {
0 1 2
}
";

    #[test]
    fn parses_counts_and_data() {
        let mesh = parse_mesh_text(SAMPLE).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].normal, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[1].uv, [0.0, 0.0]);
    }

    #[test]
    fn rejects_truncated_input() {
        let truncated = &SAMPLE[..SAMPLE.len() - 8];
        assert!(parse_mesh_text(truncated).is_err());
    }

    #[test]
    fn rejects_out_of_range_index() {
        let bad = SAMPLE.replace("0 1 2", "0 1 9");
        assert!(parse_mesh_text(&bad).is_err());
    }

    #[test]
    fn rejects_non_numeric_counts() {
        let bad = SAMPLE.replace("VertexCount: 3", "VertexCount: many");
        assert!(parse_mesh_text(&bad).is_err());
    }
}
