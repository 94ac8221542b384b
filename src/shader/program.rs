use std::sync::Arc;

use nalgebra_glm::{Mat4, Vec3};

use crate::error::{FreecamError, Result};
use crate::gpu::{Gpu, ShaderStage, Uniform};

/// A GPU program plus the shader objects attached to it.
///
/// Adding a shader marks the program as needing a link; it cannot be
/// activated again until [`ShaderProgram::link`] succeeds. Everything is
/// deleted on drop.
pub struct ShaderProgram<G: Gpu> {
    gpu: Arc<G>,
    program: G::Program,
    shaders: Vec<G::Shader>,
    needs_link: bool,
}

impl<G: Gpu> ShaderProgram<G> {
    pub fn new(gpu: &Arc<G>) -> Result<Self> {
        let program = gpu.create_program().map_err(FreecamError::Gpu)?;
        Ok(Self {
            gpu: Arc::clone(gpu),
            program,
            shaders: Vec::new(),
            needs_link: false,
        })
    }

    /// Compile both stages and link
    pub fn from_sources(gpu: &Arc<G>, vertex: &str, fragment: &str) -> Result<Self> {
        let mut program = Self::new(gpu)?;
        program.add_shader(ShaderStage::Vertex, vertex)?;
        program.add_shader(ShaderStage::Fragment, fragment)?;
        program.link()?;
        Ok(program)
    }

    pub fn add_shader(&mut self, stage: ShaderStage, source: &str) -> Result<()> {
        if source.trim().is_empty() {
            log::error!("{stage} shader source is empty");
            return Err(FreecamError::EmptyShaderSource { stage });
        }

        let shader = self.gpu.compile_shader(stage, source).map_err(|log| {
            log::error!("{stage} shader compilation failed: {log}");
            log::error!("shader source:\n{source}");
            FreecamError::ShaderCompile { stage, log }
        })?;

        self.shaders.push(shader);
        self.gpu.attach_shader(self.program, shader);
        self.needs_link = true;
        Ok(())
    }

    pub fn link(&mut self) -> Result<()> {
        self.gpu.link_program(self.program).map_err(|log| {
            log::error!("shader linking failed: {log}");
            FreecamError::ShaderLink(log)
        })?;
        self.needs_link = false;
        Ok(())
    }

    pub fn needs_link(&self) -> bool {
        self.needs_link
    }

    pub fn activate(&self) -> Result<()> {
        if self.needs_link() {
            return Err(FreecamError::ProgramNotLinked);
        }
        self.gpu.use_program(self.program);
        Ok(())
    }

    /// Activates the program and uploads `value`. Unknown names are ignored.
    pub fn set_uniform(&self, name: &str, value: impl Into<Uniform>) -> Result<()> {
        self.activate()?;
        let location = self.gpu.uniform_location(self.program, name);
        if location.is_none() {
            log::trace!("uniform '{name}' not found");
        }
        self.gpu.set_uniform(location.as_ref(), value.into());
        Ok(())
    }

    pub fn set_i32(&self, name: &str, value: i32) -> Result<()> {
        self.set_uniform(name, value)
    }

    pub fn set_f32(&self, name: &str, value: f32) -> Result<()> {
        self.set_uniform(name, value)
    }

    pub fn set_vec3(&self, name: &str, value: &Vec3) -> Result<()> {
        self.set_uniform(name, value)
    }

    pub fn set_mat4(&self, name: &str, value: &Mat4) -> Result<()> {
        self.set_uniform(name, value)
    }
}

impl<G: Gpu> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        for shader in self.shaders.drain(..) {
            self.gpu.delete_shader(shader);
        }
        self.gpu.delete_program(self.program);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::mock::{Call, MockGpu};
    use nalgebra_glm as glm;

    fn linked(gpu: &Arc<MockGpu>) -> ShaderProgram<MockGpu> {
        ShaderProgram::from_sources(gpu, "void main() {}", "void main() {}").unwrap()
    }

    #[test]
    fn from_sources_compiles_attaches_and_links() {
        let gpu = MockGpu::shared();
        let program = linked(&gpu);
        assert!(!program.needs_link());

        let calls = gpu.calls();
        assert_eq!(
            calls,
            vec![
                Call::CreateProgram(1),
                Call::CompileShader(ShaderStage::Vertex, 2),
                Call::AttachShader { program: 1, shader: 2 },
                Call::CompileShader(ShaderStage::Fragment, 3),
                Call::AttachShader { program: 1, shader: 3 },
                Call::LinkProgram(1),
            ]
        );
    }

    #[test]
    fn unlinked_program_cannot_be_used() {
        let gpu = MockGpu::shared();
        let mut program = ShaderProgram::new(&gpu).unwrap();
        program.add_shader(ShaderStage::Vertex, "void main() {}").unwrap();

        assert!(matches!(program.activate(), Err(FreecamError::ProgramNotLinked)));
        assert!(matches!(
            program.set_f32("mixU", 0.5),
            Err(FreecamError::ProgramNotLinked)
        ));
        assert_eq!(gpu.count(|c| matches!(c, Call::UseProgram(_))), 0);

        program.link().unwrap();
        program.activate().unwrap();
    }

    #[test]
    fn adding_a_shader_after_linking_requires_a_relink() {
        let gpu = MockGpu::shared();
        let mut program = linked(&gpu);
        program.add_shader(ShaderStage::Fragment, "void main() {}").unwrap();
        assert!(program.activate().is_err());
    }

    #[test]
    fn empty_source_is_rejected_before_compiling() {
        let gpu = MockGpu::shared();
        let mut program = ShaderProgram::new(&gpu).unwrap();
        let err = program.add_shader(ShaderStage::Fragment, "  \n").unwrap_err();
        assert!(matches!(
            err,
            FreecamError::EmptyShaderSource { stage: ShaderStage::Fragment }
        ));
        assert_eq!(gpu.count(|c| matches!(c, Call::CompileShader(..))), 0);
        assert!(!program.needs_link());
    }

    #[test]
    fn compile_failure_carries_the_info_log() {
        let gpu = MockGpu::shared();
        gpu.fail_compile.set(true);
        let mut program = ShaderProgram::new(&gpu).unwrap();

        match program.add_shader(ShaderStage::Vertex, "not glsl") {
            Err(FreecamError::ShaderCompile { stage, log }) => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(log.contains("syntax error"));
            }
            _ => panic!("expected a compile error"),
        }
        assert_eq!(gpu.count(|c| matches!(c, Call::AttachShader { .. })), 0);
    }

    #[test]
    fn link_failure_keeps_the_program_unusable() {
        let gpu = MockGpu::shared();
        gpu.fail_link.set(true);
        let result = ShaderProgram::from_sources(&gpu, "void main() {}", "void main() {}");
        assert!(matches!(result, Err(FreecamError::ShaderLink(_))));
    }

    #[test]
    fn setters_activate_then_upload() {
        let gpu = MockGpu::shared();
        let program = linked(&gpu);
        gpu.clear_calls();

        program.set_i32("texture1", 1).unwrap();
        program.set_vec3("lightColor", &glm::vec3(1.0, 0.5, 0.25)).unwrap();
        program.set_mat4("model", &Mat4::identity()).unwrap();

        let calls = gpu.calls();
        assert_eq!(calls[0], Call::UseProgram(1));
        assert_eq!(
            gpu.uniforms(),
            vec![
                ("texture1".to_string(), Uniform::Int(1)),
                ("lightColor".to_string(), Uniform::Vec3([1.0, 0.5, 0.25])),
                ("model".to_string(), Uniform::from(&Mat4::identity())),
            ]
        );
        assert_eq!(gpu.count(|c| matches!(c, Call::UseProgram(_))), 3);
    }

    #[test]
    fn missing_uniform_is_a_no_op() {
        let gpu = MockGpu::shared();
        gpu.missing_uniforms.borrow_mut().push("unused".to_string());
        let program = linked(&gpu);

        program.set_f32("unused", 3.0).unwrap();
        assert!(gpu.uniforms().is_empty());
    }

    #[test]
    fn drop_deletes_shaders_then_program() {
        let gpu = MockGpu::shared();
        drop(linked(&gpu));
        let calls = gpu.calls();
        assert_eq!(
            &calls[calls.len() - 3..],
            &[Call::DeleteShader(2), Call::DeleteShader(3), Call::DeleteProgram(1)]
        );
    }

    #[test]
    fn only_vertex_and_fragment_stages_are_supported() {
        assert_eq!(
            ShaderStage::from_raw(glow::VERTEX_SHADER).unwrap(),
            ShaderStage::Vertex
        );
        assert_eq!(
            ShaderStage::from_raw(glow::FRAGMENT_SHADER).unwrap(),
            ShaderStage::Fragment
        );
        assert!(matches!(
            ShaderStage::from_raw(glow::GEOMETRY_SHADER),
            Err(FreecamError::UnsupportedShaderStage(glow::GEOMETRY_SHADER))
        ));
    }
}
