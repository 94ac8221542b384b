//! Call-recording `Gpu` for unit tests (no GL context required)

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use super::{Gpu, ShaderStage, Uniform};
use crate::mesh::MeshData;
use crate::texture::TextureImage;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateProgram(u32),
    DeleteProgram(u32),
    CompileShader(ShaderStage, u32),
    DeleteShader(u32),
    AttachShader { program: u32, shader: u32 },
    LinkProgram(u32),
    UseProgram(u32),
    SetUniform { name: String, value: Uniform },
    CreateTexture { id: u32, width: u32, height: u32 },
    DeleteTexture(u32),
    BindTexture { unit: u32, texture: Option<u32> },
    UploadMesh { id: u32, vertices: usize, stride: usize },
    DeleteMesh(u32),
    DrawMesh(u32),
    Viewport(u32, u32),
    EnableDepthTest,
    Clear,
    ClearDepth,
}

#[derive(Debug, Default)]
pub struct MockGpu {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    pub fail_compile: Cell<bool>,
    pub fail_link: Cell<bool>,
    /// Uniform names `uniform_location` reports as missing.
    pub missing_uniforms: RefCell<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockMesh(pub u32);

impl MockGpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared the way the real context is, as `Arc<G>`. The recorder is
    /// single-threaded, like the GL context it stands in for.
    #[allow(clippy::arc_with_non_send_sync)]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Uniform uploads in call order.
    pub fn uniforms(&self) -> Vec<(String, Uniform)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::SetUniform { name, value } => Some((name.clone(), *value)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next(&self) -> u32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl Gpu for MockGpu {
    type Program = u32;
    type Shader = u32;
    type Texture = u32;
    type Mesh = MockMesh;
    type UniformLocation = String;

    fn create_program(&self) -> Result<Self::Program, String> {
        let id = self.next();
        self.record(Call::CreateProgram(id));
        Ok(id)
    }

    fn delete_program(&self, program: Self::Program) {
        self.record(Call::DeleteProgram(program));
    }

    fn compile_shader(&self, stage: ShaderStage, _source: &str) -> Result<Self::Shader, String> {
        if self.fail_compile.get() {
            return Err("0:1(1): error: syntax error".to_string());
        }
        let id = self.next();
        self.record(Call::CompileShader(stage, id));
        Ok(id)
    }

    fn delete_shader(&self, shader: Self::Shader) {
        self.record(Call::DeleteShader(shader));
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        self.record(Call::AttachShader { program, shader });
    }

    fn link_program(&self, program: Self::Program) -> Result<(), String> {
        self.record(Call::LinkProgram(program));
        if self.fail_link.get() {
            return Err("error: vertex output not consumed".to_string());
        }
        Ok(())
    }

    fn use_program(&self, program: Self::Program) {
        self.record(Call::UseProgram(program));
    }

    fn uniform_location(&self, _program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        if self.missing_uniforms.borrow().iter().any(|m| m == name) {
            None
        } else {
            Some(name.to_string())
        }
    }

    fn set_uniform(&self, location: Option<&Self::UniformLocation>, value: Uniform) {
        if let Some(name) = location {
            self.record(Call::SetUniform {
                name: name.clone(),
                value,
            });
        }
    }

    fn create_texture(&self, image: &TextureImage) -> Result<Self::Texture, String> {
        let id = self.next();
        self.record(Call::CreateTexture {
            id,
            width: image.width,
            height: image.height,
        });
        Ok(id)
    }

    fn delete_texture(&self, texture: Self::Texture) {
        self.record(Call::DeleteTexture(texture));
    }

    fn bind_texture(&self, unit: u32, texture: Option<Self::Texture>) {
        self.record(Call::BindTexture { unit, texture });
    }

    fn upload_mesh(&self, mesh: &MeshData) -> Result<Self::Mesh, String> {
        let id = self.next();
        self.record(Call::UploadMesh {
            id,
            vertices: mesh.vertex_count(),
            stride: mesh.stride(),
        });
        Ok(MockMesh(id))
    }

    fn delete_mesh(&self, mesh: &Self::Mesh) {
        self.record(Call::DeleteMesh(mesh.0));
    }

    fn draw_mesh(&self, mesh: &Self::Mesh) {
        self.record(Call::DrawMesh(mesh.0));
    }

    fn set_viewport(&self, width: u32, height: u32) {
        self.record(Call::Viewport(width, height));
    }

    fn enable_depth_test(&self) {
        self.record(Call::EnableDepthTest);
    }

    fn clear(&self, _color: [f32; 3]) {
        self.record(Call::Clear);
    }

    fn clear_depth(&self) {
        self.record(Call::ClearDepth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_recorder_starts_empty_and_hands_out_fresh_ids() {
        let gpu = MockGpu::shared();
        assert!(gpu.calls().is_empty());
        let program = gpu.create_program().unwrap();
        let shader = gpu.compile_shader(ShaderStage::Vertex, "void main() {}").unwrap();
        assert_ne!(program, shader);
        assert_eq!(gpu.calls().len(), 2);
    }
}
