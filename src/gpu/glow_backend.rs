use glow::HasContext;

use super::{Gpu, ShaderStage, Uniform};
use crate::mesh::MeshData;
use crate::texture::{PixelFormat, TextureImage};

/// Vertex array plus the buffers it references.
#[derive(Debug)]
pub struct GlowMesh {
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
    ebo: Option<glow::NativeBuffer>,
    count: i32,
}

impl Gpu for glow::Context {
    type Program = glow::NativeProgram;
    type Shader = glow::NativeShader;
    type Texture = glow::NativeTexture;
    type Mesh = GlowMesh;
    type UniformLocation = glow::NativeUniformLocation;

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String> {
        unsafe {
            let shader = self.create_shader(stage.to_raw())?;
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);
            if !self.get_shader_compile_status(shader) {
                let log = self.get_shader_info_log(shader);
                HasContext::delete_shader(self, shader);
                return Err(log);
            }
            Ok(shader)
        }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) -> Result<(), String> {
        unsafe {
            HasContext::link_program(self, program);
            if !self.get_program_link_status(program) {
                return Err(self.get_program_info_log(program));
            }
        }
        Ok(())
    }

    fn use_program(&self, program: Self::Program) {
        unsafe { HasContext::use_program(self, Some(program)) }
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn set_uniform(&self, location: Option<&Self::UniformLocation>, value: Uniform) {
        unsafe {
            match value {
                Uniform::Int(i) => self.uniform_1_i32(location, i),
                Uniform::Float(f) => self.uniform_1_f32(location, f),
                Uniform::Vec3([x, y, z]) => self.uniform_3_f32(location, x, y, z),
                Uniform::Mat4(m) => self.uniform_matrix_4_f32_slice(location, false, &m),
            }
        }
    }

    fn create_texture(&self, image: &TextureImage) -> Result<Self::Texture, String> {
        let format = match image.format {
            PixelFormat::Rgb => glow::RGB,
            PixelFormat::Rgba => glow::RGBA,
        };
        unsafe {
            let texture = HasContext::create_texture(self)?;
            HasContext::bind_texture(self, glow::TEXTURE_2D, Some(texture));

            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            self.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);

            // RGB rows are not 4-byte aligned for odd widths
            self.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format as i32,
                image.width.min(i32::MAX as u32) as i32,
                image.height.min(i32::MAX as u32) as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(image.pixels.as_slice())),
            );
            self.generate_mipmap(glow::TEXTURE_2D);
            HasContext::bind_texture(self, glow::TEXTURE_2D, None);
            Ok(texture)
        }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        unsafe { HasContext::delete_texture(self, texture) }
    }

    fn bind_texture(&self, unit: u32, texture: Option<Self::Texture>) {
        unsafe {
            self.active_texture(glow::TEXTURE0 + unit);
            HasContext::bind_texture(self, glow::TEXTURE_2D, texture);
        }
    }

    fn upload_mesh(&self, mesh: &MeshData) -> Result<Self::Mesh, String> {
        let stride = (mesh.stride() * std::mem::size_of::<f32>()) as i32;
        unsafe {
            let vao = self.create_vertex_array()?;
            let vbo = self.create_buffer()?;
            self.bind_vertex_array(Some(vao));

            self.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.vertices),
                glow::STATIC_DRAW,
            );

            let ebo = match &mesh.indices {
                Some(indices) => {
                    let ebo = self.create_buffer()?;
                    self.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                    self.buffer_data_u8_slice(
                        glow::ELEMENT_ARRAY_BUFFER,
                        bytemuck::cast_slice(indices),
                        glow::STATIC_DRAW,
                    );
                    Some(ebo)
                }
                None => None,
            };

            let mut offset = 0;
            for attribute in &mesh.attributes {
                self.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components as i32,
                    glow::FLOAT,
                    false,
                    stride,
                    offset,
                );
                self.enable_vertex_attrib_array(attribute.location);
                offset += (attribute.components * std::mem::size_of::<f32>()) as i32;
            }

            // the element buffer binding is VAO state, so unbind the VAO first
            self.bind_vertex_array(None);
            self.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(GlowMesh {
                vao,
                vbo,
                ebo,
                count: mesh.element_count() as i32,
            })
        }
    }

    fn delete_mesh(&self, mesh: &Self::Mesh) {
        unsafe {
            self.delete_vertex_array(mesh.vao);
            self.delete_buffer(mesh.vbo);
            if let Some(ebo) = mesh.ebo {
                self.delete_buffer(ebo);
            }
        }
    }

    fn draw_mesh(&self, mesh: &Self::Mesh) {
        unsafe {
            self.bind_vertex_array(Some(mesh.vao));
            if mesh.ebo.is_some() {
                self.draw_elements(glow::TRIANGLES, mesh.count, glow::UNSIGNED_INT, 0);
            } else {
                self.draw_arrays(glow::TRIANGLES, 0, mesh.count);
            }
            self.bind_vertex_array(None);
        }
    }

    fn set_viewport(&self, width: u32, height: u32) {
        unsafe { self.viewport(0, 0, width as i32, height as i32) }
    }

    fn enable_depth_test(&self) {
        unsafe { self.enable(glow::DEPTH_TEST) }
    }

    fn clear(&self, color: [f32; 3]) {
        unsafe {
            self.clear_color(color[0], color[1], color[2], 1.0);
            HasContext::clear(self, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn clear_depth(&self) {
        unsafe { HasContext::clear(self, glow::DEPTH_BUFFER_BIT) }
    }
}
