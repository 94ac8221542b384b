use winit::keyboard::KeyCode;

use super::{Camera, Movement};

/// Turns held keys, mouse motion and scroll into camera updates
pub struct CameraController {
    camera: Camera,
    forward_pressed: bool,
    backward_pressed: bool,
    left_pressed: bool,
    right_pressed: bool,
}

impl CameraController {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            forward_pressed: false,
            backward_pressed: false,
            left_pressed: false,
            right_pressed: false,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Returns true when the key drives the camera. Repeats should be filtered by the caller.
    pub fn on_key(&mut self, code: KeyCode, pressed: bool) -> bool {
        match code {
            KeyCode::KeyW => self.forward_pressed = pressed,
            KeyCode::KeyS => self.backward_pressed = pressed,
            KeyCode::KeyA => self.left_pressed = pressed,
            KeyCode::KeyD => self.right_pressed = pressed,
            KeyCode::KeyF => {
                if pressed {
                    let enabled = !self.camera.fps_movement();
                    self.camera.set_fps_movement(enabled);
                    log::info!("fps movement {}", if enabled { "on" } else { "off" });
                }
            }
            _ => return false,
        }
        true
    }

    /// Raw pointer delta, y pointing down
    pub fn on_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.camera.update_orientation(dx as f32, dy as f32);
    }

    pub fn on_scroll(&mut self, delta: f32) {
        self.camera.update_zoom(delta);
    }

    /// Apply held movement for one frame
    pub fn update(&mut self, dt: f32) {
        let held = [
            (self.forward_pressed, Movement::Forward),
            (self.backward_pressed, Movement::Backward),
            (self.left_pressed, Movement::Left),
            (self.right_pressed, Movement::Right),
        ];
        for (pressed, movement) in held {
            if pressed {
                self.camera.move_in(movement, dt);
            }
        }
    }

    /// Drop held keys, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.forward_pressed = false;
        self.backward_pressed = false;
        self.left_pressed = false;
        self.right_pressed = false;
    }
}
