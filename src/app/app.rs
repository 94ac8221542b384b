use std::sync::Arc;

use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;

use super::input::{FrameClock, FrameInput};
use crate::camera::{Camera, CameraController};
use crate::error::Result;
use crate::gpu::GlWindow;
use crate::hud::Hud;
use crate::mesh::{MeshData, ObjShading, hud_arrow, load_obj};
use crate::renderer::SceneRenderer;
use crate::settings::{SceneSettings, Settings};

const PIXEL_SCROLL_SCALE: f32 = 0.1;

pub struct EventResponse {
    pub exit: bool,
}

/// Everything the running demo owns.
///
/// GL resources are declared before the window so they drop while the
/// context is still alive.
pub struct App {
    hud: Hud<glow::Context>,
    scene: SceneRenderer<glow::Context>,
    controller: CameraController,
    input: FrameInput,
    clock: FrameClock,
    gl_window: GlWindow,
}

impl App {
    pub fn new(event_loop: &ActiveEventLoop, settings: &Settings) -> Result<Self> {
        let (gl_window, gl) = GlWindow::new(event_loop, &settings.window)?;
        let gl = Arc::new(gl);
        gl_window.grab_cursor();

        let (width, height) = gl_window.size();
        let scene = SceneRenderer::new(&gl, &settings.scene)?;
        scene.resize(width, height);

        let aspect_ratio = if height > 0 {
            width as f32 / height as f32
        } else {
            settings.window.width as f32 / settings.window.height.max(1) as f32
        };
        let camera = Camera::from_settings(&settings.camera, aspect_ratio);

        let mut hud = Hud::new_uncalibrated(
            &gl,
            &arrow_mesh(&settings.scene),
            settings.scene.light_color,
        )?;
        hud.calibrate(settings.camera.direction)?;

        Ok(Self {
            hud,
            scene,
            controller: CameraController::new(camera),
            input: FrameInput::new(settings.scene.mix_factor),
            clock: FrameClock::default(),
            gl_window,
        })
    }

    pub fn handle_event(&mut self, event: &WindowEvent) -> EventResponse {
        match event {
            WindowEvent::CloseRequested => return EventResponse { exit: true },
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    if !event.repeat && !self.controller.on_key(code, pressed) {
                        self.input.on_key(code, pressed);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * PIXEL_SCROLL_SCALE,
                };
                self.controller.on_scroll(scroll);
            }
            WindowEvent::Resized(size) => {
                self.gl_window.resize(size.width, size.height);
                self.scene.resize(size.width, size.height);
                self.controller
                    .camera_mut()
                    .set_window_ratio(size.width, size.height);
            }
            WindowEvent::Focused(false) => {
                self.controller.release_all();
                self.input.release_all();
            }
            WindowEvent::Focused(true) => self.gl_window.grab_cursor(),
            _ => {}
        }
        EventResponse { exit: false }
    }

    /// Raw pointer motion, unaffected by cursor grabbing.
    pub fn on_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.controller.on_mouse_motion(dx, dy);
    }

    /// Runs one frame: input, scene, HUD, present.
    pub fn render(&mut self) -> Result<EventResponse> {
        let dt = self.clock.tick();
        if self.input.update() {
            return Ok(EventResponse { exit: true });
        }
        self.controller.update(dt);

        let camera = self.controller.camera();
        self.scene.draw(camera, self.input.mix())?;
        self.hud.draw(camera)?;
        self.gl_window.swap_buffers()?;

        Ok(EventResponse { exit: false })
    }
}

fn arrow_mesh(settings: &SceneSettings) -> MeshData {
    let Some(path) = &settings.hud_arrow_obj else {
        return hud_arrow();
    };
    match load_obj(path, ObjShading::Intensity) {
        Ok(mesh) => {
            log::info!("loaded HUD arrow from {}", path.display());
            mesh
        }
        Err(e) => {
            log::warn!("{}: {e}; using the built-in arrow", path.display());
            hud_arrow()
        }
    }
}
