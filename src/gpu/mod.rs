//! The graphics operations the demo needs, behind one trait.
//!
//! `glow::Context` is the real backend. Tests use [`mock::MockGpu`], which
//! records every call instead of talking to a driver.

pub mod context;
mod glow_backend;
#[cfg(test)]
pub mod mock;

use std::fmt;

use nalgebra_glm::{Mat4, Vec3};

use crate::error::{FreecamError, Result};
use crate::mesh::MeshData;
use crate::texture::TextureImage;

pub use context::GlWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Maps a raw GL stage enum. Only vertex and fragment stages are supported.
    #[allow(dead_code)]
    pub fn from_raw(raw: u32) -> Result<Self> {
        match raw {
            glow::VERTEX_SHADER => Ok(Self::Vertex),
            glow::FRAGMENT_SHADER => Ok(Self::Fragment),
            other => Err(FreecamError::UnsupportedShaderStage(other)),
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

/// A value uploaded to a shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Int(i32),
    Float(f32),
    Vec3([f32; 3]),
    Mat4([f32; 16]),
}

impl From<i32> for Uniform {
    fn from(value: i32) -> Self {
        Uniform::Int(value)
    }
}

impl From<f32> for Uniform {
    fn from(value: f32) -> Self {
        Uniform::Float(value)
    }
}

impl From<[f32; 3]> for Uniform {
    fn from(value: [f32; 3]) -> Self {
        Uniform::Vec3(value)
    }
}

impl From<&Vec3> for Uniform {
    fn from(value: &Vec3) -> Self {
        Uniform::Vec3([value.x, value.y, value.z])
    }
}

impl From<&Mat4> for Uniform {
    fn from(value: &Mat4) -> Self {
        let mut columns = [0.0; 16];
        columns.copy_from_slice(value.as_slice());
        Uniform::Mat4(columns)
    }
}

/// Graphics device operations used by the shader, texture, mesh and HUD code.
///
/// Failures that the driver reports as text (info logs, allocation errors)
/// come back as `Err(String)`; callers wrap them into [`FreecamError`].
pub trait Gpu {
    type Program: Copy + fmt::Debug;
    type Shader: Copy + fmt::Debug;
    type Texture: Copy + fmt::Debug;
    type Mesh: fmt::Debug;
    type UniformLocation;

    fn create_program(&self) -> std::result::Result<Self::Program, String>;
    fn delete_program(&self, program: Self::Program);

    /// Compiles `source`; on failure the shader is already deleted and the
    /// info log is returned.
    fn compile_shader(
        &self,
        stage: ShaderStage,
        source: &str,
    ) -> std::result::Result<Self::Shader, String>;
    fn delete_shader(&self, shader: Self::Shader);
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program) -> std::result::Result<(), String>;
    fn use_program(&self, program: Self::Program);

    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;
    /// A `None` location is a no-op, matching GL's handling of location -1.
    fn set_uniform(&self, location: Option<&Self::UniformLocation>, value: Uniform);

    /// Creates a 2D texture with repeat wrapping, linear filtering and mipmaps.
    fn create_texture(&self, image: &TextureImage) -> std::result::Result<Self::Texture, String>;
    fn delete_texture(&self, texture: Self::Texture);
    fn bind_texture(&self, unit: u32, texture: Option<Self::Texture>);

    fn upload_mesh(&self, mesh: &MeshData) -> std::result::Result<Self::Mesh, String>;
    fn delete_mesh(&self, mesh: &Self::Mesh);
    fn draw_mesh(&self, mesh: &Self::Mesh);

    fn set_viewport(&self, width: u32, height: u32);
    fn enable_depth_test(&self);
    fn clear(&self, color: [f32; 3]);
    fn clear_depth(&self);
}
