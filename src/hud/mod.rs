//! Axis indicator drawn in the bottom-right corner of the screen.
//!
//! The three arrows ignore the scene's view and projection. They only follow
//! the camera's yaw and pitch, relative to the yaw the camera started with.

use std::sync::Arc;

use nalgebra_glm as glm;
use nalgebra_glm::{Mat4, Vec3};

use crate::camera::Camera;
use crate::error::{FreecamError, Result};
use crate::gpu::Gpu;
use crate::mesh::{Mesh, MeshData};
use crate::shader::{ShaderProgram, sources};

const SCREEN_OFFSET: [f32; 3] = [0.7, -0.8, 0.0];
const ARROW_SCALE: f32 = 0.015;

struct AxisArrow {
    name: &'static str,
    /// Rotation applied to the +Y arrow mesh, in degrees.
    angle: f32,
    axis: [f32; 3],
    color: [f32; 3],
}

const ARROWS: [AxisArrow; 3] = [
    AxisArrow {
        name: "X",
        angle: 90.0,
        axis: [1.0, 0.0, 0.0],
        color: [0.8, 0.0, 0.2],
    },
    AxisArrow {
        name: "Y",
        angle: 0.0,
        axis: [0.0, 1.0, 0.0],
        color: [0.0, 0.3, 0.8],
    },
    AxisArrow {
        name: "Z",
        angle: -90.0,
        axis: [0.0, 0.0, 1.0],
        color: [0.2, 0.8, 0.0],
    },
];

impl AxisArrow {
    fn model(&self) -> Mat4 {
        glm::rotate(
            &Mat4::identity(),
            self.angle.to_radians(),
            &Vec3::from(self.axis),
        )
    }
}

/// Yaw the HUD treats as "facing its X arrow", fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudCalibration {
    offset_yaw: f32,
}

impl HudCalibration {
    /// `direction` must be exactly a unit vector along one of ±X or ±Z.
    pub fn from_direction(direction: [f32; 3]) -> Result<Self> {
        let [x, y, z] = direction;
        let along_x = x.abs() == 1.0 && y == 0.0 && z == 0.0;
        let along_z = z.abs() == 1.0 && y == 0.0 && x == 0.0;

        let offset_yaw = match (along_x, along_z) {
            (true, false) if x > 0.0 => 0.0,
            (true, false) => 180.0,
            (false, true) if z > 0.0 => 90.0,
            (false, true) => 270.0,
            _ => return Err(FreecamError::HudDirectionNotAxisAligned(direction)),
        };
        Ok(Self { offset_yaw })
    }

    pub fn offset_yaw(&self) -> f32 {
        self.offset_yaw
    }

    /// Screen-space transform for the given camera angles, in degrees.
    pub fn rotation(&self, yaw: f32, pitch: f32) -> Mat4 {
        let base = glm::scale(
            &glm::translate(&Mat4::identity(), &Vec3::from(SCREEN_OFFSET)),
            &glm::vec3(ARROW_SCALE, ARROW_SCALE, ARROW_SCALE),
        );
        let turned = glm::rotate(
            &base,
            (self.offset_yaw - yaw).to_radians(),
            &glm::vec3(0.0, 1.0, 0.0),
        );
        glm::rotate(&turned, (-pitch).to_radians(), &glm::vec3(1.0, 0.0, 0.0))
    }
}

pub struct Hud<G: Gpu> {
    gpu: Arc<G>,
    program: ShaderProgram<G>,
    arrow: Mesh<G>,
    calibration: Option<HudCalibration>,
}

impl<G: Gpu> Hud<G> {
    /// Builds the HUD program and uploads the arrow. Call [`Hud::calibrate`] before drawing.
    pub fn new_uncalibrated(gpu: &Arc<G>, arrow: &MeshData, light_color: [f32; 3]) -> Result<Self> {
        let program = ShaderProgram::from_sources(gpu, sources::HUD_VERTEX, sources::HUD_FRAGMENT)?;
        program.set_uniform("lightColor", light_color)?;
        let arrow = Mesh::upload(gpu, arrow)?;

        Ok(Self {
            gpu: Arc::clone(gpu),
            program,
            arrow,
            calibration: None,
        })
    }

    pub fn calibrate(&mut self, initial_direction: [f32; 3]) -> Result<HudCalibration> {
        if self.calibration.is_some() {
            return Err(FreecamError::HudAlreadyCalibrated);
        }
        let calibration = HudCalibration::from_direction(initial_direction)?;
        log::info!(
            "HUD calibrated: offset yaw {} from start direction {initial_direction:?}",
            calibration.offset_yaw()
        );
        self.calibration = Some(calibration);
        Ok(calibration)
    }

    #[cfg(test)]
    pub fn calibration(&self) -> Option<&HudCalibration> {
        self.calibration.as_ref()
    }

    /// Clears depth so the arrows always sit on top, then draws X, Y and Z.
    pub fn draw(&self, camera: &Camera) -> Result<()> {
        let calibration = self.calibration.ok_or(FreecamError::HudNotCalibrated)?;

        self.gpu.clear_depth();
        self.program.set_mat4(
            "rotation",
            &calibration.rotation(camera.yaw(), camera.pitch()),
        )?;

        for arrow in &ARROWS {
            log::trace!("drawing HUD arrow {}", arrow.name);
            self.program.set_uniform("objectColor", arrow.color)?;
            self.program.set_mat4("model", &arrow.model())?;
            self.arrow.draw();
        }
        Ok(())
    }
}
