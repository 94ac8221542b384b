use super::{MeshData, VertexAttribute};

#[rustfmt::skip]
const CUBE_VERTICES: [f32; 36 * 8] = [
    // positions          normals              texture coords
    -0.5, -0.5, -0.5,   0.0,  0.0, -1.0,   0.0, 0.0,
     0.5, -0.5, -0.5,   0.0,  0.0, -1.0,   1.0, 0.0,
     0.5,  0.5, -0.5,   0.0,  0.0, -1.0,   1.0, 1.0,
     0.5,  0.5, -0.5,   0.0,  0.0, -1.0,   1.0, 1.0,
    -0.5,  0.5, -0.5,   0.0,  0.0, -1.0,   0.0, 1.0,
    -0.5, -0.5, -0.5,   0.0,  0.0, -1.0,   0.0, 0.0,

    -0.5, -0.5,  0.5,   0.0,  0.0,  1.0,   0.0, 0.0,
     0.5, -0.5,  0.5,   0.0,  0.0,  1.0,   1.0, 0.0,
     0.5,  0.5,  0.5,   0.0,  0.0,  1.0,   1.0, 1.0,
     0.5,  0.5,  0.5,   0.0,  0.0,  1.0,   1.0, 1.0,
    -0.5,  0.5,  0.5,   0.0,  0.0,  1.0,   0.0, 1.0,
    -0.5, -0.5,  0.5,   0.0,  0.0,  1.0,   0.0, 0.0,

    -0.5,  0.5,  0.5,  -1.0,  0.0,  0.0,   1.0, 0.0,
    -0.5,  0.5, -0.5,  -1.0,  0.0,  0.0,   1.0, 1.0,
    -0.5, -0.5, -0.5,  -1.0,  0.0,  0.0,   0.0, 1.0,
    -0.5, -0.5, -0.5,  -1.0,  0.0,  0.0,   0.0, 1.0,
    -0.5, -0.5,  0.5,  -1.0,  0.0,  0.0,   0.0, 0.0,
    -0.5,  0.5,  0.5,  -1.0,  0.0,  0.0,   1.0, 0.0,

     0.5,  0.5,  0.5,   1.0,  0.0,  0.0,   1.0, 0.0,
     0.5,  0.5, -0.5,   1.0,  0.0,  0.0,   1.0, 1.0,
     0.5, -0.5, -0.5,   1.0,  0.0,  0.0,   0.0, 1.0,
     0.5, -0.5, -0.5,   1.0,  0.0,  0.0,   0.0, 1.0,
     0.5, -0.5,  0.5,   1.0,  0.0,  0.0,   0.0, 0.0,
     0.5,  0.5,  0.5,   1.0,  0.0,  0.0,   1.0, 0.0,

    -0.5, -0.5, -0.5,   0.0, -1.0,  0.0,   0.0, 1.0,
     0.5, -0.5, -0.5,   0.0, -1.0,  0.0,   1.0, 1.0,
     0.5, -0.5,  0.5,   0.0, -1.0,  0.0,   1.0, 0.0,
     0.5, -0.5,  0.5,   0.0, -1.0,  0.0,   1.0, 0.0,
    -0.5, -0.5,  0.5,   0.0, -1.0,  0.0,   0.0, 0.0,
    -0.5, -0.5, -0.5,   0.0, -1.0,  0.0,   0.0, 1.0,

    -0.5,  0.5, -0.5,   0.0,  1.0,  0.0,   0.0, 1.0,
     0.5,  0.5, -0.5,   0.0,  1.0,  0.0,   1.0, 1.0,
     0.5,  0.5,  0.5,   0.0,  1.0,  0.0,   1.0, 0.0,
     0.5,  0.5,  0.5,   0.0,  1.0,  0.0,   1.0, 0.0,
    -0.5,  0.5,  0.5,   0.0,  1.0,  0.0,   0.0, 0.0,
    -0.5,  0.5, -0.5,   0.0,  1.0,  0.0,   0.0, 1.0,
];

/// Unit cube as 36 unindexed vertices: position, normal, texture coordinate.
pub fn textured_cube() -> MeshData {
    MeshData {
        vertices: CUBE_VERTICES.to_vec(),
        indices: None,
        attributes: vec![
            VertexAttribute::new(0, 3),
            VertexAttribute::new(1, 3),
            VertexAttribute::new(2, 2),
        ],
    }
}
