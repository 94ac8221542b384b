pub mod arrow;
pub mod cube;
pub mod obj;

pub use arrow::hud_arrow;
pub use cube::textured_cube;
pub use obj::{ObjShading, load_obj};

use std::sync::Arc;

use crate::error::{FreecamError, Result};
use crate::gpu::Gpu;

/// One interleaved vertex attribute, `components` floats wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: usize,
}

impl VertexAttribute {
    pub const fn new(location: u32, components: usize) -> Self {
        Self {
            location,
            components,
        }
    }
}

/// Interleaved vertex data ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Option<Vec<u32>>,
    pub attributes: Vec<VertexAttribute>,
}

impl MeshData {
    /// Floats per vertex.
    pub fn stride(&self) -> usize {
        self.attributes.iter().map(|a| a.components).sum()
    }

    pub fn vertex_count(&self) -> usize {
        match self.stride() {
            0 => 0,
            stride => self.vertices.len() / stride,
        }
    }

    /// Number of vertices a draw call walks: indices when present, vertices otherwise.
    pub fn element_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.vertex_count(),
        }
    }

    #[cfg(test)]
    pub fn vertex(&self, index: usize) -> &[f32] {
        let stride = self.stride();
        &self.vertices[index * stride..(index + 1) * stride]
    }
}

/// A mesh living on the GPU; released when dropped.
pub struct Mesh<G: Gpu> {
    gpu: Arc<G>,
    raw: G::Mesh,
}

impl<G: Gpu> Mesh<G> {
    pub fn upload(gpu: &Arc<G>, data: &MeshData) -> Result<Self> {
        let raw = gpu.upload_mesh(data).map_err(FreecamError::Gpu)?;
        Ok(Self {
            gpu: Arc::clone(gpu),
            raw,
        })
    }

    pub fn draw(&self) {
        self.gpu.draw_mesh(&self.raw);
    }
}

impl<G: Gpu> Drop for Mesh<G> {
    fn drop(&mut self) {
        self.gpu.delete_mesh(&self.raw);
    }
}
