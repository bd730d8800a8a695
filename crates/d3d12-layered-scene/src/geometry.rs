/// Interleaved vertex layout shared by every mesh and pipeline state:
/// position, normal, uv — 32 bytes per vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PositionNormalUv {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

pub const VERTEX_STRIDE: u32 = std::mem::size_of::<PositionNormalUv>() as u32;

/// CPU-side mesh data as produced by the generators or the text loader.
/// Indices are always 32-bit.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<PositionNormalUv>,
    pub indices: Vec<u32>,
}

/// The mesh shapes the scene is built from. Doubles as the index into the
/// resident mesh array. The gem comes from a text file; the others are
/// generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshKind {
    Grid = 0,
    Box = 1,
    Gem = 2,
}

pub const MESH_KIND_COUNT: usize = 3;

/// Flat grid in the XZ plane centered on the origin, normals up,
/// UVs spanning [0,1] across the full extent.
pub fn create_grid(width: f32, depth: f32, column_count: u32, row_count: u32) -> MeshData {
    let half_width = 0.5 * width;
    let half_depth = 0.5 * depth;
    let cell_width = width / (column_count - 1) as f32;
    let cell_depth = depth / (row_count - 1) as f32;
    let cell_u = 1.0 / (column_count - 1) as f32;
    let cell_v = 1.0 / (row_count - 1) as f32;

    let mut vertices = Vec::with_capacity((column_count * row_count) as usize);
    for row in 0..row_count {
        let z = half_depth - row as f32 * cell_depth;
        for column in 0..column_count {
            let x = -half_width + column as f32 * cell_width;
            vertices.push(PositionNormalUv {
                position: [x, 0.0, z],
                normal: [0.0, 1.0, 0.0],
                uv: [column as f32 * cell_u, row as f32 * cell_v],
            });
        }
    }

    // Two triangles per cell, both winding through the cell diagonal.
    const INDICES_PER_CELL: u32 = 6;
    let mut indices =
        Vec::with_capacity(((column_count - 1) * (row_count - 1) * INDICES_PER_CELL) as usize);
    for row in 0..row_count - 1 {
        for column in 0..column_count - 1 {
            let top_left = row * column_count + column;
            let top_right = top_left + 1;
            let bottom_left = (row + 1) * column_count + column;
            let bottom_right = bottom_left + 1;
            indices.extend_from_slice(&[
                top_left,
                top_right,
                bottom_left,
                bottom_left,
                top_right,
                bottom_right,
            ]);
        }
    }

    MeshData { vertices, indices }
}

/// Axis-aligned box centered on the origin: 4 vertices per face so each face
/// carries its own flat normal, 36 indices.
pub fn create_box(width: f32, height: f32, depth: f32) -> MeshData {
    let w = 0.5 * width;
    let h = 0.5 * height;
    let d = 0.5 * depth;

    let left = [-1.0, 0.0, 0.0];
    let right = [1.0, 0.0, 0.0];
    let up = [0.0, 1.0, 0.0];
    let down = [0.0, -1.0, 0.0];
    let forward = [0.0, 0.0, 1.0];
    let back = [0.0, 0.0, -1.0];

    let top_left = [0.0, 0.0];
    let top_right = [0.0, 1.0];
    let bottom_left = [1.0, 0.0];
    let bottom_right = [1.0, 1.0];

    let face = |positions: [[f32; 3]; 4], normal: [f32; 3]| {
        [
            PositionNormalUv { position: positions[0], normal, uv: top_right },
            PositionNormalUv { position: positions[1], normal, uv: top_left },
            PositionNormalUv { position: positions[2], normal, uv: bottom_left },
            PositionNormalUv { position: positions[3], normal, uv: bottom_right },
        ]
    };

    let mut vertices = Vec::with_capacity(24);
    vertices.extend(face(
        [[-w, -h, -d], [-w, h, -d], [w, h, -d], [w, -h, -d]],
        back,
    ));
    vertices.extend(face(
        [[-w, -h, d], [w, -h, d], [w, h, d], [-w, h, d]],
        forward,
    ));
    vertices.extend(face([[-w, h, -d], [-w, h, d], [w, h, d], [w, h, -d]], up));
    vertices.extend(face(
        [[-w, -h, -d], [w, -h, -d], [w, -h, d], [-w, -h, d]],
        down,
    ));
    vertices.extend(face(
        [[-w, -h, d], [-w, h, d], [-w, h, -d], [-w, -h, -d]],
        left,
    ));
    vertices.extend(face(
        [[w, -h, -d], [w, h, -d], [w, h, d], [w, -h, d]],
        right,
    ));

    let mut indices = Vec::with_capacity(36);
    for f in 0..6u32 {
        let base = f * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_stride_is_32_bytes() {
        assert_eq!(VERTEX_STRIDE, 32);
    }

    #[test]
    fn grid_3x3_counts() {
        let grid = create_grid(3.0, 3.0, 3, 3);
        assert_eq!(grid.vertices.len(), 9);
        assert_eq!(grid.indices.len(), 24);
    }

    #[test]
    fn grid_indices_in_range() {
        let grid = create_grid(3.0, 3.0, 3, 3);
        assert!(grid.indices.iter().all(|&i| (i as usize) < grid.vertices.len()));
    }

    #[test]
    fn grid_quads_share_one_diagonal_edge() {
        let grid = create_grid(3.0, 3.0, 3, 3);
        for cell in grid.indices.chunks_exact(6) {
            let first: std::collections::HashSet<u32> = cell[..3].iter().copied().collect();
            let second: std::collections::HashSet<u32> = cell[3..].iter().copied().collect();
            let shared: Vec<u32> = first.intersection(&second).copied().collect();
            assert_eq!(shared.len(), 2, "triangles must share exactly the diagonal");
        }
    }

    #[test]
    fn grid_lies_flat_with_up_normals() {
        let grid = create_grid(4.0, 2.0, 5, 3);
        for vertex in &grid.vertices {
            assert_eq!(vertex.position[1], 0.0);
            assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn box_counts() {
        let cube = create_box(1.0, 1.0, 1.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube.indices.iter().all(|&i| i < 24));
    }

    #[test]
    fn box_normals_are_axis_aligned_unit_vectors() {
        let cube = create_box(2.0, 3.0, 4.0);
        for vertex in &cube.vertices {
            let n = vertex.normal;
            let length_squared = n[0] * n[0] + n[1] * n[1] + n[2] * n[2];
            assert_eq!(length_squared, 1.0);
        }
    }

    #[test]
    fn box_extents_match_dimensions() {
        let cube = create_box(2.0, 4.0, 6.0);
        for vertex in &cube.vertices {
            assert_eq!(vertex.position[0].abs(), 1.0);
            assert_eq!(vertex.position[1].abs(), 2.0);
            assert_eq!(vertex.position[2].abs(), 3.0);
        }
    }
}
