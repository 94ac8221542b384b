use nalgebra_glm as glm;
use nalgebra_glm::{Mat4, Vec3};

use crate::settings::CameraSettings;

pub const PITCH_LIMIT: f32 = 89.9;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

const DEFAULT_SPEED: f32 = 3.0;
const DEFAULT_SENSITIVITY: f32 = 0.1;
const DEFAULT_ASPECT: f32 = 800.0 / 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Free-flying camera. Angles are in degrees; the look direction is always
/// derived from yaw and pitch as `(cos yaw, sin pitch, sin yaw)`.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    up: Vec3,
    zoom: f32,
    aspect_ratio: f32,
    projection: Mat4,
    speed: f32,
    sensitivity: f32,
    fps_movement: bool,
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            up: glm::vec3(0.0, 1.0, 0.0),
            zoom: MAX_ZOOM,
            aspect_ratio: DEFAULT_ASPECT,
            projection: Mat4::identity(),
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            fps_movement: false,
        };
        camera.update_projection();
        camera
    }

    /// Camera at `position` facing `direction`. A zero direction faces -Z;
    /// a vertical one faces -Z tilted to the pitch limit.
    pub fn looking_along(position: Vec3, direction: Vec3) -> Self {
        let horizontal = (direction.x * direction.x + direction.z * direction.z).sqrt();
        if horizontal <= f32::EPSILON {
            let pitch = if direction.y == 0.0 {
                0.0
            } else {
                PITCH_LIMIT.copysign(direction.y)
            };
            return Self::new(position, -90.0, pitch);
        }
        // the horizontal part of the look vector is unit length, so sin(pitch) is the slope
        let yaw = direction.z.atan2(direction.x).to_degrees();
        let pitch = (direction.y / horizontal).clamp(-1.0, 1.0).asin().to_degrees();
        Self::new(position, yaw, pitch)
    }

    pub fn from_settings(settings: &CameraSettings, aspect_ratio: f32) -> Self {
        let mut camera = Self::looking_along(
            Vec3::from(settings.position),
            Vec3::from(settings.direction),
        );
        camera.speed = settings.speed;
        camera.sensitivity = settings.sensitivity;
        camera.zoom = settings.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        camera.fps_movement = settings.fps_movement;
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            camera.aspect_ratio = aspect_ratio;
        }
        camera.update_projection();
        camera
    }

    /// Applies a cursor delta in window coordinates (y grows downward).
    pub fn update_orientation(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity_x();
        self.pitch = (self.pitch - dy * self.sensitivity_y()).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn update_zoom(&mut self, scroll_delta: f32) {
        self.zoom = (self.zoom - scroll_delta).clamp(MIN_ZOOM, MAX_ZOOM);
        self.update_projection();
    }

    pub fn move_in(&mut self, movement: Movement, dt: f32) {
        let step = self.speed * dt;
        let forward = self.movement_forward();
        let right = glm::normalize(&glm::cross(&self.direction(), &self.up));

        match movement {
            Movement::Forward => self.position += forward * step,
            Movement::Backward => self.position -= forward * step,
            Movement::Left => self.position -= right * step,
            Movement::Right => self.position += right * step,
        }
    }

    fn movement_forward(&self) -> Vec3 {
        let direction = self.direction();
        if !self.fps_movement {
            return glm::normalize(&direction);
        }
        glm::vec3(direction.x, 0.0, direction.z)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros)
    }

    pub fn view_matrix(&self) -> Mat4 {
        let target = self.position + self.direction();
        glm::look_at(&self.position, &target, &self.up)
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    /// Ignores zero-sized dimensions, which a minimized window reports.
    pub fn set_window_ratio(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect_ratio = width as f32 / height as f32;
        self.update_projection();
    }

    fn update_projection(&mut self) {
        self.projection = glm::perspective(
            self.aspect_ratio(),
            self.zoom().to_radians(),
            NEAR_PLANE,
            FAR_PLANE,
        );
    }

    /// Look vector. Its horizontal part is unit length, so it is longer than
    /// one whenever pitch is not zero; movement normalizes it.
    pub fn direction(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        glm::vec3(yaw.cos(), pitch.sin(), yaw.sin())
    }

    pub fn sensitivity_x(&self) -> f32 {
        self.sensitivity / self.aspect_ratio()
    }

    pub fn sensitivity_y(&self) -> f32 {
        self.sensitivity
    }

    pub fn set_fps_movement(&mut self, enabled: bool) {
        self.fps_movement = enabled;
    }

    pub fn fps_movement(&self) -> bool {
        self.fps_movement
    }

    pub fn position(&self) -> &Vec3 {
        &self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default(), DEFAULT_ASPECT)
    }
}
