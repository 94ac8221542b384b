use std::sync::Arc;

use nalgebra_glm as glm;
use nalgebra_glm::{Mat4, Vec3};

use crate::camera::Camera;
use crate::error::Result;
use crate::gpu::Gpu;
use crate::mesh::{Mesh, textured_cube};
use crate::settings::SceneSettings;
use crate::shader::{ShaderProgram, sources};
use crate::texture::{Texture, load_texture, white_texture};

const CUBE_SPIN_DEGREES: f32 = 20.0;
const LIGHT_CUBE_SCALE: f32 = 0.2;

/// Textured, lit cubes plus the small cube marking the light.
pub struct SceneRenderer<G: Gpu> {
    gpu: Arc<G>,
    cube_program: ShaderProgram<G>,
    light_program: ShaderProgram<G>,
    cube: Mesh<G>,
    textures: [Texture<G>; 2],
    cube_positions: Vec<Vec3>,
    light_position: Vec3,
    clear_color: [f32; 3],
}

impl<G: Gpu> SceneRenderer<G> {
    pub fn new(gpu: &Arc<G>, settings: &SceneSettings) -> Result<Self> {
        let cube_program =
            ShaderProgram::from_sources(gpu, sources::SCENE_VERTEX, sources::SCENE_FRAGMENT)?;
        let light_program =
            ShaderProgram::from_sources(gpu, sources::LIGHT_VERTEX, sources::LIGHT_FRAGMENT)?;

        let textures = [
            Self::texture_or_white(gpu, &settings.primary_texture, false)?,
            Self::texture_or_white(gpu, &settings.secondary_texture, true)?,
        ];

        cube_program.set_i32("texture1", 0)?;
        cube_program.set_i32("texture2", 1)?;
        cube_program.set_uniform("objectColor", settings.object_color)?;
        cube_program.set_uniform("lightColor", settings.light_color)?;
        cube_program.set_uniform("lightPos", settings.light_position)?;
        light_program.set_uniform("lightColor", settings.light_color)?;

        let cube = Mesh::upload(gpu, &textured_cube())?;
        gpu.enable_depth_test();

        Ok(Self {
            gpu: Arc::clone(gpu),
            cube_program,
            light_program,
            cube,
            textures,
            cube_positions: settings.cube_positions.iter().copied().map(Vec3::from).collect(),
            light_position: Vec3::from(settings.light_position),
            clear_color: settings.clear_color,
        })
    }

    fn texture_or_white(gpu: &Arc<G>, path: &std::path::Path, has_alpha: bool) -> Result<Texture<G>> {
        match load_texture(gpu, path, has_alpha) {
            Ok(texture) => Ok(texture),
            Err(e) => {
                log::warn!("using a white texture in place of {}: {e}", path.display());
                white_texture(gpu)
            }
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.gpu.set_viewport(width, height);
        }
    }

    pub fn draw(&self, camera: &Camera, mix_factor: f32) -> Result<()> {
        self.gpu.clear(self.clear_color);

        let projection = camera.projection_matrix();
        let view = camera.view_matrix();

        self.cube_program.set_mat4("projection", projection)?;
        self.cube_program.set_mat4("view", &view)?;
        self.cube_program.set_vec3("viewPos", camera.position())?;
        self.cube_program.set_f32("mixU", mix_factor)?;

        for (unit, texture) in self.textures.iter().enumerate() {
            texture.bind(unit as u32);
        }

        for (i, position) in self.cube_positions.iter().enumerate() {
            self.cube_program.set_mat4("model", &cube_model(position, i))?;
            self.cube.draw();
        }

        self.light_program.set_mat4("projection", projection)?;
        self.light_program.set_mat4("view", &view)?;
        self.light_program.set_mat4("model", &light_model(&self.light_position))?;
        self.cube.draw();
        Ok(())
    }
}

fn cube_model(position: &Vec3, index: usize) -> Mat4 {
    let model = glm::translate(&Mat4::identity(), position);
    glm::rotate(
        &model,
        (CUBE_SPIN_DEGREES * index as f32).to_radians(),
        &glm::vec3(1.0, 0.3, 0.5),
    )
}

fn light_model(position: &Vec3) -> Mat4 {
    let model = glm::translate(&Mat4::identity(), position);
    glm::scale(&model, &glm::vec3(LIGHT_CUBE_SCALE, LIGHT_CUBE_SCALE, LIGHT_CUBE_SCALE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::Uniform;
    use crate::gpu::mock::{Call, MockGpu};
    use std::path::PathBuf;

    fn settings() -> SceneSettings {
        SceneSettings {
            primary_texture: PathBuf::from("missing/container.jpg"),
            secondary_texture: PathBuf::from("missing/awesomeface.png"),
            ..SceneSettings::default()
        }
    }

    #[test]
    fn missing_textures_fall_back_to_white() {
        let gpu = MockGpu::shared();
        let _scene = SceneRenderer::new(&gpu, &settings()).unwrap();
        let fallbacks = gpu.count(|c| {
            matches!(
                c,
                Call::CreateTexture {
                    width: 1,
                    height: 1,
                    ..
                }
            )
        });
        assert_eq!(fallbacks, 2);
        assert_eq!(gpu.count(|c| *c == Call::EnableDepthTest), 1);
    }

    #[test]
    fn draw_renders_every_cube_then_the_light() {
        let gpu = MockGpu::shared();
        let settings = settings();
        let scene = SceneRenderer::new(&gpu, &settings).unwrap();
        gpu.clear_calls();

        scene.draw(&Camera::default(), 0.35).unwrap();

        let calls = gpu.calls();
        assert_eq!(calls[0], Call::Clear);
        assert_eq!(
            gpu.count(|c| matches!(c, Call::DrawMesh(_))),
            settings.cube_positions.len() + 1
        );
        assert_eq!(
            gpu.count(|c| matches!(c, Call::BindTexture { texture: Some(_), .. })),
            2
        );
        assert!(
            gpu.uniforms()
                .contains(&("mixU".to_string(), Uniform::Float(0.35)))
        );
    }

    #[test]
    fn first_cube_is_not_rotated() {
        let position = glm::vec3(2.0, 5.0, -15.0);
        let translated = glm::translate(&Mat4::identity(), &position);
        let model = cube_model(&position, 0);
        assert!((model - translated).abs().max() < 1e-6);
        assert!((cube_model(&position, 1) - translated).abs().max() > 0.1);
    }

    #[test]
    fn light_cube_is_shrunk_around_the_light() {
        let model = light_model(&glm::vec3(1.2, 1.0, 2.0));
        let corner = model * glm::vec4(0.5, 0.5, 0.5, 1.0);
        assert!((corner.x - 1.3).abs() < 1e-6);
        assert!((corner.y - 1.1).abs() < 1e-6);
        assert!((corner.z - 2.1).abs() < 1e-6);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let gpu = MockGpu::shared();
        let scene = SceneRenderer::new(&gpu, &settings()).unwrap();
        gpu.clear_calls();
        scene.resize(0, 600);
        scene.resize(1024, 768);
        assert_eq!(gpu.calls(), vec![Call::Viewport(1024, 768)]);
    }
}
